use crate::i18n::Language;

pub fn render(credential: &str, language: Language) -> String {
    let t = language.strings();
    let shown = if credential.is_empty() {
        format!("<{}>", t.api_key_placeholder)
    } else {
        mask_credential(credential)
    };
    [
        format!("⚙ {}", t.settings),
        format!("{}: {}", t.api_key_label, shown),
        t.api_key_help.to_string(),
        format!("key <value>: {}   close: {}", t.save, t.cancel),
    ]
    .join("\n")
}

/// Keeps only the last four characters visible.
pub fn mask_credential(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    if chars.len() <= 4 {
        return "•".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "•".repeat((chars.len() - 4).min(8)), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask_credential("abc"), "•••");
        assert_eq!(mask_credential("AIzaSyExample1234"), "••••••••1234");
    }

    #[test]
    fn test_dialog_never_prints_the_key() {
        let text = render("AIzaSyExample1234", Language::En);
        assert!(!text.contains("AIzaSyExample"));
        assert!(text.contains("Gemini API Key: ••••••••1234"));

        let empty = render("", Language::Pt);
        assert!(empty.contains("<Cole sua chave de API>"));
    }
}
