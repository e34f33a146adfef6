//! Invocation gate: decides whether the full pipeline runs at all.

/// Triggers about council sessions and their documents.
const SESSION_KEYWORDS: &[&str] = &[
    "sesj",
    "posiedzeni",
    "komisj",
    "uchwał",
    "protokoł",
    "protokół",
    "porządek obrad",
    "głosowani",
    "interpelacj",
];

/// Triggers about government registries and official lookups.
const REGISTRY_KEYWORDS: &[&str] = &[
    "krs",
    "ceidg",
    "regon",
    "rejestr",
    "spółk",
    "fundacj",
    "stowarzyszeni",
];

/// Triggers about statistics and budget data.
const STATISTICS_KEYWORDS: &[&str] = &[
    "statysty",
    "gus",
    "demograf",
    "ludnoś",
    "budżet",
    "wydatk",
    "dochod",
    "ile mieszkańców",
];

/// Triggers about legal acts.
const LEGAL_KEYWORDS: &[&str] = &[
    "ustaw",
    "rozporządzeni",
    "dziennik ustaw",
    "monitor polski",
    "akt prawn",
    "kodeks",
    "przepis",
];

/// Triggers about spatial and land data.
const SPATIAL_KEYWORDS: &[&str] = &[
    "działk",
    "mpzp",
    "plan zagospodarowania",
    "geoportal",
    "mapa",
    "grunt",
    "nieruchomoś",
];

/// Calendar and task action verbs.
const ACTION_KEYWORDS: &[&str] = &[
    "kalendarz",
    "przypomnij",
    "zadani",
    "spotkani",
    "termin",
    "zaplanuj",
    "dodaj",
    "usuń",
    "zapisz",
];

/// Verification requests.
const VERIFICATION_KEYWORDS: &[&str] = &[
    "sprawdź",
    "zweryfikuj",
    "czy to prawda",
    "potwierdź",
    "znajdź",
    "wyszukaj",
];

/// Decide whether the orchestration pipeline should handle this message.
///
/// Pure predicate over fixed keyword tables; stems are matched as lowercase
/// substrings so Polish inflections hit the same rule. No match means "use
/// the lightweight completion path", never an error.
pub fn should_use_orchestrator(message: &str) -> bool {
    let lower = message.to_lowercase();

    SESSION_KEYWORDS
        .iter()
        .chain(REGISTRY_KEYWORDS)
        .chain(STATISTICS_KEYWORDS)
        .chain(LEGAL_KEYWORDS)
        .chain(SPATIAL_KEYWORDS)
        .chain(ACTION_KEYWORDS)
        .chain(VERIFICATION_KEYWORDS)
        .any(|keyword| lower.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_question_matches() {
        assert!(should_use_orchestrator("Co było na ostatniej sesji rady?"));
        assert!(should_use_orchestrator("Pokaż uchwały z XIV posiedzenia"));
    }

    #[test]
    fn test_registry_and_statistics_match() {
        assert!(should_use_orchestrator("Sprawdź w KRS spółkę gminną"));
        assert!(should_use_orchestrator("Jaki jest budżet gminy na 2025?"));
    }

    #[test]
    fn test_calendar_verbs_match() {
        assert!(should_use_orchestrator("Dodaj do kalendarza spotkanie w piątek"));
    }

    #[test]
    fn test_casual_chat_does_not_match() {
        assert!(!should_use_orchestrator("Cześć, jak się masz?"));
        assert!(!should_use_orchestrator("Napisz krótki wierszyk o wiośnie"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(should_use_orchestrator("SESJA RADY MIASTA"));
    }
}
