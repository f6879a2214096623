/// Replace `${ENV_VAR}` placeholders in raw config text.
///
/// Unresolvable or malformed placeholders are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// The implementation behind [`substitute_env`]; the injected lookup makes
/// it testable without mutating the process environment.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => result.push_str(&value),
                    None => {
                        result.push_str("${");
                        result.push_str(name);
                        result.push('}');
                    },
                }
                rest = &after[end + 1..];
            },
            _ => {
                // No closing brace (or empty name): emit literally and stop
                // scanning for placeholders in the remainder.
                result.push_str("${");
                rest = after;
            },
        }
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "KHIDMAT_TOKEN" => Some("sesame".into()),
            "EMPTYABLE" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn substitutes_known_var() {
        assert_eq!(
            substitute_env_with("verify_token = \"${KHIDMAT_TOKEN}\"", lookup),
            "verify_token = \"sesame\""
        );
    }

    #[test]
    fn leaves_unknown_var() {
        assert_eq!(
            substitute_env_with("${KHIDMAT_NONEXISTENT}", lookup),
            "${KHIDMAT_NONEXISTENT}"
        );
    }

    #[test]
    fn handles_multiple_placeholders() {
        assert_eq!(
            substitute_env_with("${KHIDMAT_TOKEN}-${KHIDMAT_TOKEN}", lookup),
            "sesame-sesame"
        );
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        assert_eq!(substitute_env_with("a ${OOPS", lookup), "a ${OOPS");
    }

    #[test]
    fn no_placeholders() {
        assert_eq!(substitute_env("plain text"), "plain text");
    }
}
