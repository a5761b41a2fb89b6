//! Classification rule tables
//!
//! Each table is an ordered list of rules. The first rule that produces a
//! result decides the classification.

use super::Category;
use std::sync::LazyLock;

/// Trait for classification rules
pub trait Rule<T>: Send + Sync {
    /// Rule name
    fn name(&self) -> &str;

    /// Result of this rule for uppercased input text, if it applies
    fn apply(&self, text: &str) -> Option<T>;
}

/// Rule that fires when any of its keywords is a substring of the input
pub struct KeywordRule<T> {
    name: String,
    keywords: Vec<&'static str>,
    result: T,
}

impl<T: Clone> KeywordRule<T> {
    /// Create a rule. Keywords must already be uppercase.
    pub fn new(name: &str, keywords: &[&'static str], result: T) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.to_vec(),
            result,
        }
    }

    /// Keywords checked by this rule
    pub fn keywords(&self) -> &[&'static str] {
        &self.keywords
    }
}

impl<T: Clone + Send + Sync> Rule<T> for KeywordRule<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, text: &str) -> Option<T> {
        self.keywords
            .iter()
            .any(|k| text.contains(k))
            .then(|| self.result.clone())
    }
}

/// Ordered collection of rules evaluated with first-match-wins semantics
pub struct RuleSet<T> {
    rules: Vec<Box<dyn Rule<T>>>,
}

impl<T> RuleSet<T> {
    /// Create a rule set from rules in priority order
    pub fn new(rules: Vec<Box<dyn Rule<T>>>) -> Self {
        Self { rules }
    }

    /// Result of the first rule that applies
    pub fn first_match(&self, text: &str) -> Option<T> {
        self.rules.iter().find_map(|rule| rule.apply(text))
    }

    /// Name of the first rule that applies
    pub fn matching_rule(&self, text: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.apply(text).is_some())
            .map(|rule| rule.name())
    }

    /// Number of rules in the set
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

static CATEGORY_RULES: LazyLock<RuleSet<Category>> = LazyLock::new(|| {
    RuleSet::new(vec![
        Box::new(KeywordRule::new(
            "memorias",
            &["MEMORIA", "CALCULO", "MC", "DESIGN"],
            Category::Memorias,
        )),
        Box::new(KeywordRule::new(
            "proceso_constructivo",
            &["PROCESO", "CONSTRUCTIVO", "PROCEDIMIENTO", "MANUAL", "METODOLOGIA"],
            Category::ProcesoConstructivo,
        )),
        Box::new(KeywordRule::new(
            "geometrico",
            &["GEOMETRICO", "TRAZO", "TOPOGRAFIA", "ALINEAMIENTO", "PERFIL"],
            Category::Geometrico,
        )),
        Box::new(KeywordRule::new(
            "odt",
            &["ODT", "ORDEN DE TRABAJO"],
            Category::Odt,
        )),
        Box::new(KeywordRule::new(
            "subestructura",
            &["CIMENTACION", "ZAPATA", "PILOTE", "TERRACERIA", "EXCAVACION"],
            Category::Subestructura,
        )),
        Box::new(KeywordRule::new(
            "superestructura",
            &[
                "COLUMNA", "VIGA", "LOSA", "ACERO", "ESTRUCTURA", "MONTAJE", "TRABE",
                "CABALLETE", "NU 200", "NU-200", "CABEZAL",
            ],
            Category::Superestructura,
        )),
        Box::new(KeywordRule::new(
            "arquitectura",
            &["ARQUITECTURA", "ACABADO", "MURO", "FACHADA"],
            Category::Arquitectura,
        )),
    ])
});

/// Construction elements in match order
const ELEMENT_KEYWORDS: [&str; 27] = [
    "CABALLETE", "ZAPATA", "PILOTE", "TERRACERIA", "EXCAVACION",
    "COLUMNA", "VIGA", "LOSA", "ACERO", "MONTAJE", "TRABE",
    "PARAPETO", "PROCESO", "GEOMETRICO", "TOPOGRAFIA", "ODT",
    "ALERO", "ESTRIBO", "DIAFRAGMA", "PRELOSA", "GUARNICION",
    "BANCO", "TOPE", "NEOPRENO", "MURETE", "PREFABRICADOS", "CABEZAL",
];

static SUBCATEGORY_RULES: LazyLock<RuleSet<&'static str>> = LazyLock::new(|| {
    let mut rules: Vec<Box<dyn Rule<&'static str>>> = vec![Box::new(KeywordRule::new(
        "prefabricados_nu_200",
        &["NU-200", "NU 200"],
        "PREFABRICADOS",
    ))];
    for keyword in ELEMENT_KEYWORDS {
        rules.push(Box::new(KeywordRule::new(
            &keyword.to_lowercase(),
            &[keyword],
            keyword,
        )));
    }
    RuleSet::new(rules)
});

/// Discipline rules in priority order
pub fn category_rules() -> &'static RuleSet<Category> {
    &CATEGORY_RULES
}

/// Construction element rules in priority order
pub fn subcategory_rules() -> &'static RuleSet<&'static str> {
    &SUBCATEGORY_RULES
}
