//! Localized display strings, looked up by stable key.
//!
//! The core never hard-codes a display language. Element labels use the
//! key `elements.<type_key>`; UI notices and export headings use their own
//! dotted keys. Hosts plug in their translation layer by implementing
//! [`LabelProvider`]; French and English tables ship as defaults.

use crate::model::ElementType;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Source of localized strings.
pub trait LabelProvider {
    /// Look up `key`, or `None` when the table has no entry.
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>>;

    /// Look up `key`, falling back to the key itself.
    fn text(&self, key: &str) -> String {
        self.lookup(key)
            .map(Cow::into_owned)
            .unwrap_or_else(|| key.to_string())
    }

    /// Display label for an element type, e.g. `"Mur"` for walls.
    fn element_label(&self, ty: ElementType) -> String {
        self.text(&format!("elements.{}", ty.key()))
    }
}

/// Bundled languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

/// A fixed key → text table.
#[derive(Debug, Clone, Copy)]
pub struct StaticLabels {
    entries: &'static [(&'static str, &'static str)],
}

impl StaticLabels {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Fr => Self { entries: FRENCH },
            Locale::En => Self { entries: ENGLISH },
        }
    }
}

impl Default for StaticLabels {
    fn default() -> Self {
        Self::for_locale(Locale::default())
    }
}

impl LabelProvider for StaticLabels {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| Cow::Borrowed(*v))
    }
}

const FRENCH: &[(&str, &str)] = &[
    ("elements.wall", "Mur"),
    ("elements.door", "Porte"),
    ("elements.window", "Fenêtre"),
    ("elements.shelf", "Étagère"),
    ("elements.rack", "Portant"),
    ("elements.display", "Présentoir"),
    ("elements.table", "Table"),
    ("elements.fridge", "Frigo"),
    ("elements.dairy_fridge", "Frigo Produits Laitiers"),
    ("elements.planogram", "Planogramme"),
    ("elements.gondola", "Gondole"),
    ("elements.line", "Ligne"),
    ("elements.rectangle", "Rectangle"),
    ("elements.circle", "Cercle"),
    ("elements.chair", "Chaise"),
    ("elements.sofa", "Canapé"),
    ("elements.bed", "Lit"),
    ("elements.plant", "Plante"),
    ("elements.counter", "Comptoir"),
    ("elements.cashier", "Caisse"),
    ("elements.mannequin", "Mannequin"),
    ("elements.cube", "Cube"),
    ("notice.door_needs_wall", "Les portes doivent être placées contre un mur"),
    ("notice.window_needs_wall", "Les fenêtres doivent être placées dans un mur"),
    ("notice.import_failed", "Fichier invalide : le plan n'a pas été importé"),
    ("notice.import_done", "Plan importé"),
    ("notice.load_failed", "Impossible d'ouvrir le plan"),
    ("notice.save_failed", "Échec de l'enregistrement du plan"),
    ("notice.saved", "Plan enregistré"),
    ("notice.export_failed", "Échec de l'export du plan"),
    ("export.title", "Plan du magasin"),
    ("export.generated_on", "Généré le"),
    ("export.element_count", "Nombre d'éléments"),
    ("export.legend", "Légende"),
];

const ENGLISH: &[(&str, &str)] = &[
    ("elements.wall", "Wall"),
    ("elements.door", "Door"),
    ("elements.window", "Window"),
    ("elements.shelf", "Shelf"),
    ("elements.rack", "Rack"),
    ("elements.display", "Display"),
    ("elements.table", "Table"),
    ("elements.fridge", "Fridge"),
    ("elements.dairy_fridge", "Dairy fridge"),
    ("elements.planogram", "Planogram"),
    ("elements.gondola", "Gondola"),
    ("elements.line", "Line"),
    ("elements.rectangle", "Rectangle"),
    ("elements.circle", "Circle"),
    ("elements.chair", "Chair"),
    ("elements.sofa", "Sofa"),
    ("elements.bed", "Bed"),
    ("elements.plant", "Plant"),
    ("elements.counter", "Counter"),
    ("elements.cashier", "Cashier"),
    ("elements.mannequin", "Mannequin"),
    ("elements.cube", "Cube"),
    ("notice.door_needs_wall", "Doors must be placed against a wall"),
    ("notice.window_needs_wall", "Windows must be placed inside a wall"),
    ("notice.import_failed", "Invalid file: the plan was not imported"),
    ("notice.import_done", "Plan imported"),
    ("notice.load_failed", "Could not open the plan"),
    ("notice.save_failed", "Could not save the plan"),
    ("notice.saved", "Plan saved"),
    ("notice.export_failed", "Could not export the plan"),
    ("export.title", "Store floor plan"),
    ("export.generated_on", "Generated on"),
    ("export.element_count", "Element count"),
    ("export.legend", "Legend"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_element_type_has_a_label_in_each_locale() {
        for locale in [Locale::Fr, Locale::En] {
            let labels = StaticLabels::for_locale(locale);
            for ty in ElementType::ALL {
                let key = format!("elements.{}", ty.key());
                assert!(labels.lookup(&key).is_some(), "{locale:?} missing {key}");
            }
        }
    }

    #[test]
    fn french_is_default() {
        let labels = StaticLabels::default();
        assert_eq!(labels.element_label(ElementType::Wall), "Mur");
        assert_eq!(labels.element_label(ElementType::DairyFridge), "Frigo Produits Laitiers");
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        let labels = StaticLabels::for_locale(Locale::En);
        assert_eq!(labels.text("export.unknown"), "export.unknown");
    }
}
