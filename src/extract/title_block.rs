//! Description suggestions from title blocks

/// Title-block labels whose values describe a drawing
const LABELS: [&str; 5] = ["CONTENIDO", "PLANO:", "PROYECTO:", "CONTIENE:", "TITULO:"];

const MAX_ITEMS: usize = 4;
const MAX_CAPS_LINES: usize = 3;

/// Build a short description from the text of a first page.
///
/// Labelled title-block values are preferred; otherwise the first all-caps
/// lines are used. Returns an empty string when nothing qualifies.
pub fn auto_description(first_page: &str) -> String {
    let lines: Vec<&str> = first_page
        .lines()
        .map(str::trim)
        .filter(|l| l.chars().count() > 3)
        .collect();

    let mut items = Vec::new();
    for line in &lines {
        let upper = line.to_uppercase();
        for label in LABELS {
            if let Some((_, value)) = upper.split_once(label) {
                let value = value.trim();
                if value.chars().count() > 2 {
                    items.push(format!("{} {}", title_case(label), value));
                }
            }
        }
    }

    if items.is_empty() {
        items = lines
            .iter()
            .filter(|l| is_all_caps(l) && !l.replace(' ', "").chars().all(|c| c.is_ascii_digit()))
            .take(MAX_CAPS_LINES)
            .map(|l| l.to_string())
            .collect();
    }

    items.truncate(MAX_ITEMS);
    items.join(" | ")
}

fn title_case(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// At least one cased character and no lowercase ones
fn is_all_caps(line: &str) -> bool {
    line.chars().any(|c| c.is_uppercase()) && !line.chars().any(|c| c.is_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_values() {
        let page = "Tren Interurbano\nPLANO: Armado de losa\nProyecto: Puente 12\nnotas";
        assert_eq!(
            auto_description(page),
            "Plano: ARMADO DE LOSA | Proyecto: PUENTE 12"
        );
    }

    #[test]
    fn test_short_values_fall_back_to_caps() {
        assert_eq!(auto_description("PLANO: AB\nhola mundo"), "PLANO: AB");
        assert_eq!(auto_description("plano: ab\nhola mundo"), "");
    }

    #[test]
    fn test_caps_fallback() {
        let page = "DETALLE DE ZAPATA\n12 34 56\nescala 1:50\nCORTE A-A\nARMADO\nNOTAS GENERALES";
        assert_eq!(auto_description(page), "DETALLE DE ZAPATA | CORTE A-A | ARMADO");
    }

    #[test]
    fn test_items_capped() {
        let page = "CONTENIDO uno uno\nCONTENIDO dos dos\nCONTENIDO tres\nCONTENIDO cuatro\nCONTENIDO cinco";
        assert_eq!(auto_description(page).split(" | ").count(), 4);
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(auto_description(""), "");
    }
}
