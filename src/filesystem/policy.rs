//! Behaviour switches for the places where the reference model had latent
//! defects. Every default picks the corrected behaviour; the alternative
//! reproduces the old one for compatibility.

use derive_more::Display;

/// Order in which the segments of a `/`-separated path are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum PathResolution {
    #[default]
    #[display("left-to-right")]
    LeftToRight,
    /// Last segment first, as the stack-based resolver did.
    #[display("reversed")]
    Reversed,
}

/// What `cut` does with the source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum CutPolicy {
    #[default]
    #[display("move")]
    Move,
    /// Clone under the new parent and leave the original in place.
    #[display("duplicate")]
    Duplicate,
}

/// Sibling order used by the line export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ExportOrder {
    #[default]
    #[display("natural")]
    Natural,
    /// Last child first at every level.
    #[display("stack")]
    Stack,
}

/// Whether a failing import keeps the lines applied before the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ImportMode {
    #[default]
    #[display("atomic")]
    Atomic,
    #[display("prefix")]
    Prefix,
}

macro_rules! setting_values {
    ($ty:ty { $($value:literal => $variant:expr),+ $(,)? }) => {
        impl $ty {
            pub fn from_setting(value: &str) -> Option<Self> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($value => Some($variant),)+
                    _ => None,
                }
            }
        }
    };
}

setting_values!(PathResolution {
    "left-to-right" => PathResolution::LeftToRight,
    "reversed" => PathResolution::Reversed,
});
setting_values!(CutPolicy {
    "move" => CutPolicy::Move,
    "duplicate" => CutPolicy::Duplicate,
});
setting_values!(ExportOrder {
    "natural" => ExportOrder::Natural,
    "stack" => ExportOrder::Stack,
});
setting_values!(ImportMode {
    "atomic" => ImportMode::Atomic,
    "prefix" => ImportMode::Prefix,
});

/// The full set of switches, carried by the tree and the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreePolicy {
    pub path_resolution: PathResolution,
    pub cut: CutPolicy,
    pub export_order: ExportOrder,
    pub import: ImportMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[test]
    fn defaults_pick_corrected_behaviour() {
        let policy = TreePolicy::default();
        assert_eq!(policy.path_resolution, PathResolution::LeftToRight);
        assert_eq!(policy.cut, CutPolicy::Move);
        assert_eq!(policy.export_order, ExportOrder::Natural);
        assert_eq!(policy.import, ImportMode::Atomic);
    }

    #[rstest]
    #[case("reversed", Some(PathResolution::Reversed))]
    #[case(" Left-To-Right ", Some(PathResolution::LeftToRight))]
    #[case("backwards", None)]
    fn path_resolution_from_setting(#[case] raw: &str, #[case] expected: Option<PathResolution>) {
        assert_eq!(PathResolution::from_setting(raw), expected);
    }

    #[test]
    fn display_round_trips_through_from_setting() {
        for cut in [CutPolicy::Move, CutPolicy::Duplicate] {
            assert_eq!(CutPolicy::from_setting(&cut.to_string()), Some(cut));
        }
        for order in [ExportOrder::Natural, ExportOrder::Stack] {
            assert_eq!(ExportOrder::from_setting(&order.to_string()), Some(order));
        }
        for mode in [ImportMode::Atomic, ImportMode::Prefix] {
            assert_eq!(ImportMode::from_setting(&mode.to_string()), Some(mode));
        }
    }
}
