//! Per-class configuration

/// Default deepest inheritance chain accepted at declaration
pub const DEFAULT_MAX_LINEAGE_DEPTH: usize = 64;

/// Options fixed when a class is declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassOptions {
    /// Require the declared constructor to be named after its class
    pub check_constructor_name: bool,

    /// Deepest inheritance chain accepted
    pub max_lineage_depth: usize,

    /// Allow external writes to introduce undeclared public members
    pub allow_dynamic_members: bool,
}

impl Default for ClassOptions {
    fn default() -> Self {
        Self {
            check_constructor_name: true,
            max_lineage_depth: DEFAULT_MAX_LINEAGE_DEPTH,
            allow_dynamic_members: true,
        }
    }
}

impl ClassOptions {
    /// Options that only accept writes to declared members
    pub fn sealed_members() -> Self {
        Self {
            allow_dynamic_members: false,
            ..Default::default()
        }
    }

    /// Options with a specific inheritance depth limit
    pub fn with_max_lineage_depth(max_lineage_depth: usize) -> Self {
        Self {
            max_lineage_depth,
            ..Default::default()
        }
    }

    /// Options that skip the constructor name check
    pub fn lenient_constructor_name() -> Self {
        Self {
            check_constructor_name: false,
            ..Default::default()
        }
    }
}
