/// User-facing confirmation strings.
///
/// The catalog itself is bilingual (English/Spanish descriptions); these are the
/// only strings the service produces for end users, so a full message-catalog
/// dependency is not warranted.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Read the `lang` query parameter; anything other than "es" means English.
    pub fn from_query(query: &str) -> Self {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "lang")
            .map(|(_, value)| {
                if value.eq_ignore_ascii_case("es") {
                    Locale::Es
                } else {
                    Locale::En
                }
            })
            .unwrap_or_default()
    }
}

/// Confirmation shown after a resource is flagged for review.
pub fn flag_success(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Thank you! This resource has been flagged for review.",
        Locale::Es => "¡Gracias! Este recurso ha sido marcado para revisión.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_query() {
        assert_eq!(Locale::from_query(""), Locale::En);
        assert_eq!(Locale::from_query("lang=en"), Locale::En);
        assert_eq!(Locale::from_query("lang=es"), Locale::Es);
        assert_eq!(Locale::from_query("lang=ES"), Locale::Es);
        assert_eq!(Locale::from_query("lang=fr"), Locale::En);
        assert_eq!(Locale::from_query("search=x&lang=es"), Locale::Es);
    }

    #[test]
    fn test_flag_success_strings_differ_by_locale() {
        assert_ne!(flag_success(Locale::En), flag_success(Locale::Es));
    }
}
