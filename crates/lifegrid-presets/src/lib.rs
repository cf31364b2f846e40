//! Built-in presets for lifegrid.
//!
//! Each module pairs a parameter struct (with sensible [`Default`]s) with
//! the rule types it installs. [`catalog`] returns every preset with
//! default parameters.
//!
//! | Preset | Channels | Effect |
//! |---|---|---|
//! | [`Heat`] | `heat` | births add heat, heat decays every generation |
//! | [`Age`] | `age` | generations survived by each live cell |
//! | [`Sediment`] | `sediment` | deaths deposit sediment |
//! | [`RgbHistory`] | `history_r`, `history_g`, `history_b` | fast/medium/slow moving averages of liveness |
//! | [`Edges`] | `edge` | live cells bordering a dead neighbour |
//! | [`toroidal`] | none | wraps the grid while active |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod age;
pub mod edges;
pub mod heat;
pub mod rgb_history;
pub mod sediment;
pub mod toroidal;

pub use age::Age;
pub use edges::Edges;
pub use heat::Heat;
pub use rgb_history::RgbHistory;
pub use sediment::Sediment;
pub use toroidal::toroidal;

use lifegrid_rules::Preset;

/// Every built-in preset with default parameters, in table order.
pub fn catalog() -> Vec<Preset> {
    vec![
        Heat::default().preset(),
        Age::default().preset(),
        Sediment::default().preset(),
        RgbHistory::default().preset(),
        Edges.preset(),
        toroidal(),
    ]
}

/// Look up a built-in preset by name.
pub fn by_name(name: &str) -> Option<Preset> {
    catalog().into_iter().find(|p| p.name() == name)
}

/// Reject non-finite channel writes.
pub(crate) fn check_finite(
    channel: &str,
    cell_index: usize,
    value: f32,
) -> Result<f32, lifegrid_core::RuleError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(lifegrid_core::RuleError::InvalidValue {
            channel: channel.to_string(),
            cell_index,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique_and_findable() {
        let names: Vec<String> = catalog().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(
            names,
            vec!["heat", "age", "sediment", "rgb_history", "edges", "toroidal"]
        );
        for name in &names {
            assert!(by_name(name).is_some());
        }
        assert!(by_name("plasma").is_none());
    }

    #[test]
    fn check_finite_rejects_nan() {
        assert_eq!(check_finite("heat", 0, 0.5), Ok(0.5));
        assert!(check_finite("heat", 3, f32::NAN).is_err());
        assert!(check_finite("heat", 3, f32::INFINITY).is_err());
    }
}
