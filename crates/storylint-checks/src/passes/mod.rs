//! The built-in validation passes and their registry.

mod citations;
mod coverage;
mod criteria;
mod discipline;
mod metadata;
mod template;

pub use citations::CitationsResolve;
pub use coverage::TaskCoverage;
pub use criteria::CriteriaQuality;
pub use discipline::CitationDiscipline;
pub use metadata::MetadataPresence;
pub use template::TemplateSections;

use crate::check::Check;
use std::sync::Arc;

/// Identifiers of every built-in check, in canonical run order.
pub const BUILTIN_IDS: [&str; 6] = [
    metadata::ID,
    template::ID,
    criteria::ID,
    coverage::ID,
    citations::ID,
    discipline::ID,
];

/// Instantiates every built-in check, in canonical run order.
#[must_use]
pub fn builtin_checks() -> Vec<Arc<dyn Check>> {
    vec![
        Arc::new(MetadataPresence),
        Arc::new(TemplateSections),
        Arc::new(CriteriaQuality),
        Arc::new(TaskCoverage),
        Arc::new(CitationsResolve),
        Arc::new(CitationDiscipline),
    ]
}

/// Whether an identifier names a built-in check.
#[must_use]
pub fn is_builtin(id: &str) -> bool {
    BUILTIN_IDS.contains(&id)
}

/// Looks up a built-in check by identifier.
#[must_use]
pub fn find_builtin(id: &str) -> Option<Arc<dyn Check>> {
    builtin_checks().into_iter().find(|check| check.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_ids_match_check_ids() {
        let checks = builtin_checks();
        assert_eq!(checks.len(), BUILTIN_IDS.len());
        for (check, id) in checks.iter().zip(BUILTIN_IDS) {
            assert_eq!(check.id(), id);
            assert!(is_builtin(id));
        }
    }

    #[test]
    fn unknown_id_is_not_builtin() {
        assert!(!is_builtin("made-up-check"));
        assert!(find_builtin("made-up-check").is_none());
    }

    #[test]
    fn find_builtin_returns_the_named_check() {
        let check = find_builtin("task-coverage").expect("registered");
        assert_eq!(check.id(), "task-coverage");
    }
}
