use super::domain::{AssessmentError, Category, Criterion, MAX_CRITERION_SCORE};
use std::collections::HashSet;

/// Immutable set of weighted categories the reviewer scores against.
#[derive(Debug, Clone)]
pub struct AssessmentSchema {
    categories: Vec<Category>,
}

impl AssessmentSchema {
    /// Builds a custom schema after checking the invariants the aggregation
    /// engine depends on.
    pub fn new(categories: Vec<Category>) -> Result<Self, AssessmentError> {
        if categories.is_empty() {
            return Err(AssessmentError::EmptySchema);
        }

        let mut category_ids = HashSet::new();
        for category in &categories {
            if !category_ids.insert(category.id) {
                return Err(AssessmentError::DuplicateCategory(category.id.to_string()));
            }
            if category.criteria.is_empty() {
                return Err(AssessmentError::EmptyCategory(category.id.to_string()));
            }

            let mut criterion_ids = HashSet::new();
            for criterion in &category.criteria {
                if !criterion_ids.insert(criterion.id) {
                    return Err(AssessmentError::DuplicateCriterion {
                        category_id: category.id.to_string(),
                        criterion_id: criterion.id.to_string(),
                    });
                }
            }
        }

        let total_weight: u32 = categories.iter().map(|c| u32::from(c.weight)).sum();
        if total_weight != 100 {
            return Err(AssessmentError::WeightMismatch(total_weight));
        }

        Ok(Self { categories })
    }

    pub fn standard() -> Self {
        Self {
            categories: standard_categories(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.id == category_id)
    }

    pub fn first_category_id(&self) -> &'static str {
        // `new` and `standard` both guarantee at least one category.
        self.categories.first().map(|c| c.id).unwrap_or_default()
    }

    pub fn total_weight(&self) -> u32 {
        self.categories.iter().map(|c| u32::from(c.weight)).sum()
    }

    pub fn max_total(&self) -> u32 {
        self.total_weight() * u32::from(MAX_CRITERION_SCORE)
    }

    pub fn criterion_count(&self) -> usize {
        self.categories.iter().map(|c| c.criteria.len()).sum()
    }

    /// Resolves a (category, criterion) pair, failing on either unknown id.
    pub fn resolve(
        &self,
        category_id: &str,
        criterion_id: &str,
    ) -> Result<(&Category, &Criterion), AssessmentError> {
        let category = self
            .category(category_id)
            .ok_or_else(|| AssessmentError::UnknownCategory(category_id.to_string()))?;
        let criterion =
            category
                .criterion(criterion_id)
                .ok_or_else(|| AssessmentError::UnknownCriterion {
                    category_id: category_id.to_string(),
                    criterion_id: criterion_id.to_string(),
                })?;
        Ok((category, criterion))
    }
}

fn criteria(entries: &[(&'static str, &'static str)]) -> Vec<Criterion> {
    entries
        .iter()
        .map(|&(id, text)| Criterion { id, text })
        .collect()
}

fn standard_categories() -> Vec<Category> {
    vec![
        Category {
            id: "c1",
            title: "1. Zielerreichung und strategischer Fit",
            weight: 15,
            criteria: criteria(&[
                ("1.1", "Zielbild war klar, messbar, schriftlich vorhanden"),
                ("1.2", "Problemdefinition fachlich, nicht technisch, war sauber"),
                ("1.3", "Zielkennzahlen wurden erreicht"),
                ("1.4", "Nutzen war vor Go Live validiert, Pilot oder Test"),
                ("1.5", "Abweichungen sind dokumentiert und begründet"),
            ]),
        },
        Category {
            id: "c2",
            title: "2. Operative Effizienz und Wirtschaftlichkeit",
            weight: 20,
            criteria: criteria(&[
                ("2.1", "Bearbeitungszeit pro Vorgang sank"),
                ("2.2", "Manuelle Tätigkeiten gingen zurück"),
                ("2.3", "Fehler oder Nacharbeit gingen zurück"),
                ("2.4", "Budget und Zeitplan wurden eingehalten"),
                ("2.5", "Betriebskosten sind tragbar und transparent"),
            ]),
        },
        Category {
            id: "c3",
            title: "3. Nutzen für Bürgerinnen und Bürger",
            weight: 20,
            criteria: criteria(&[
                ("3.1", "Warte- und Durchlaufzeiten für Bürger wurden besser"),
                (
                    "3.2",
                    "Servicequalität stieg, gemessen über Feedback oder Beschwerden",
                ),
                ("3.3", "Nutzungsrate des digitalen Angebots stieg"),
                ("3.4", "Barrierefreiheit ist erfüllt"),
                (
                    "3.5",
                    "Fairness, keine systematische Benachteiligung nachweisbar",
                ),
            ]),
        },
        Category {
            id: "c4",
            title: "4. Daten und KI Qualität",
            weight: 15,
            criteria: criteria(&[
                ("4.1", "Datenqualität ist definiert und wird überwacht"),
                ("4.2", "Daten sind aktuell, Vollständigkeit ist akzeptabel"),
                ("4.3", "Modellleistung ist messbar und ausreichend"),
                ("4.4", "Ergebnisse sind fachlich plausibel und erklärbar"),
                ("4.5", "Monitoring für Drift, Fehler, Bias ist aktiv"),
            ]),
        },
        Category {
            id: "c5",
            title: "5. Recht, Datenschutz, IT Sicherheit",
            weight: 20,
            criteria: criteria(&[
                ("5.1", "Rechtsgrundlage dokumentiert"),
                ("5.2", "DSGVO Prüfung, TOMs, Löschkonzept vorhanden"),
                ("5.3", "DSFA durchgeführt falls nötig"),
                ("5.4", "IT Sicherheitsanforderungen erfüllt, Audit oder Test"),
                (
                    "5.5",
                    "Transparenz, Dokumentation, Nachvollziehbarkeit vorhanden",
                ),
            ]),
        },
        Category {
            id: "c6",
            title: "6. Akzeptanz und Organisation",
            weight: 5,
            criteria: criteria(&[
                ("6.1", "Mitarbeitende nutzen das System wirklich im Alltag"),
                ("6.2", "Schulung und Change waren ausreichend"),
                ("6.3", "Rollen, Zuständigkeiten, Support sind geklärt"),
            ]),
        },
        Category {
            id: "c7",
            title: "7. Nachhaltigkeit und Wiederverwendbarkeit",
            weight: 5,
            criteria: criteria(&[
                ("7.1", "Betrieb und Wartung sind langfristig gesichert"),
                ("7.2", "Lösung ist skalierbar und integrierbar"),
                ("7.3", "Wiederverwendung für andere Bereiche ist realistisch"),
            ]),
        },
    ]
}
