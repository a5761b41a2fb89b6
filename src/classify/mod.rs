//! Document classification by discipline and construction element
//!
//! Classification is keyword driven:
//! - `categorize` assigns a discipline [`Category`] from file name, path and description
//! - `subcategorize` tags the construction element within a category
//!
//! Both are evaluated as ordered rule tables with first-match-wins semantics.

mod rules;

pub use rules::{category_rules, subcategory_rules, KeywordRule, Rule, RuleSet};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Subcategory returned for every document in [`Category::Memorias`]
pub const MEMORIA_SUBCATEGORY: &str = "MEMORIA";

/// Subcategory returned when no element keyword matches
pub const GENERAL_SUBCATEGORY: &str = "GENERAL";

/// Discipline of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Design and calculation reports
    Memorias,
    /// Construction procedures and method statements
    ProcesoConstructivo,
    /// Geometry, survey and alignment
    Geometrico,
    /// Work orders
    #[serde(rename = "ODT")]
    Odt,
    /// Foundations and earthworks
    Subestructura,
    /// Columns, beams, slabs, steel
    Superestructura,
    /// Architecture and finishes
    Arquitectura,
    /// Anything else
    General,
}

impl Category {
    /// All categories in classification priority order
    pub const ALL: [Category; 8] = [
        Category::Memorias,
        Category::ProcesoConstructivo,
        Category::Geometrico,
        Category::Odt,
        Category::Subestructura,
        Category::Superestructura,
        Category::Arquitectura,
        Category::General,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Memorias => "Memorias",
            Category::ProcesoConstructivo => "Proceso Constructivo",
            Category::Geometrico => "Geométrico",
            Category::Odt => "ODT",
            Category::Subestructura => "Subestructura",
            Category::Superestructura => "Superestructura",
            Category::Arquitectura => "Arquitectura",
            Category::General => "General",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Memorias => "Memorias",
            Category::ProcesoConstructivo => "ProcesoConstructivo",
            Category::Geometrico => "Geometrico",
            Category::Odt => "ODT",
            Category::Subestructura => "Subestructura",
            Category::Superestructura => "Superestructura",
            Category::Arquitectura => "Arquitectura",
            Category::General => "General",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the identifier or the label, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.to_string().to_lowercase() == wanted || c.label().to_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Assign a discipline from the file name, its path and an optional description
pub fn categorize(file_name: &str, path_context: &str, description: &str) -> Category {
    let text = format!("{} {} {}", file_name, path_context, description).to_uppercase();
    category_rules().first_match(&text).unwrap_or(Category::General)
}

/// Tag the construction element of a document within its category
pub fn subcategorize(file_name: &str, category: Category) -> String {
    if category == Category::Memorias {
        return MEMORIA_SUBCATEGORY.to_string();
    }

    let name = file_name.to_uppercase();
    subcategory_rules()
        .first_match(&name)
        .unwrap_or(GENERAL_SUBCATEGORY)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_priority() {
        assert_eq!(categorize("MEMORIA_VIGA.pdf", "", ""), Category::Memorias);
        assert_eq!(categorize("viga_t1.pdf", "", ""), Category::Superestructura);
        assert_eq!(categorize("zapata_z3.pdf", "", ""), Category::Subestructura);
    }

    #[test]
    fn test_categorize_uses_path_and_description() {
        assert_eq!(
            categorize("plano_01.pdf", "Proyecto/Topografia/plano_01.pdf", ""),
            Category::Geometrico
        );
        assert_eq!(
            categorize("plano_01.pdf", "", "orden de trabajo 15"),
            Category::Odt
        );
    }

    #[test]
    fn test_categorize_general_fallback() {
        assert_eq!(categorize("foto.pdf", "ProyectoX/foto.pdf", ""), Category::General);
    }

    #[test]
    fn test_categorize_nu_200() {
        assert_eq!(categorize("trabe nu 200.pdf", "", ""), Category::Superestructura);
    }

    #[test]
    fn test_subcategorize() {
        assert_eq!(
            subcategorize("puente_nu-200.pdf", Category::Superestructura),
            "PREFABRICADOS"
        );
        assert_eq!(subcategorize("x.pdf", Category::Memorias), "MEMORIA");
        assert_eq!(subcategorize("viga_zapata.pdf", Category::Memorias), "MEMORIA");
        assert_eq!(
            subcategorize("detalle_zapata_columna.pdf", Category::Subestructura),
            "ZAPATA"
        );
        assert_eq!(subcategorize("cabezal.pdf", Category::Superestructura), "CABEZAL");
        assert_eq!(subcategorize("croquis.pdf", Category::General), "GENERAL");
    }

    #[test]
    fn test_subcategorize_list_order() {
        // CABALLETE precedes PILOTE in the element list
        assert_eq!(
            subcategorize("pilote_caballete.pdf", Category::Subestructura),
            "CABALLETE"
        );
        // PRELOSA contains LOSA, which comes first
        assert_eq!(subcategorize("prelosa.pdf", Category::Superestructura), "LOSA");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("odt".parse::<Category>().unwrap(), Category::Odt);
        assert_eq!("Proceso Constructivo".parse::<Category>().unwrap(), Category::ProcesoConstructivo);
        assert_eq!("geometrico".parse::<Category>().unwrap(), Category::Geometrico);
        assert!("nothing".parse::<Category>().is_err());
    }
}
