use crate::{ComposerOptions, EnrichmentResult, MedicineMatch, MedicineRecord, QueryIntent};

pub const NOT_AVAILABLE: &str = "Not available";

pub const NO_MATCH_MESSAGE: &str = "\
## I don't have information about that.

I couldn't find a confident match for your question in the medicine dataset.

**Here are some suggestions:**
• Try using the generic name of the medicine
• Check the spelling of the medicine name
• Describe your symptoms instead of the medicine name
• Ask about the condition you want to treat

**You can ask me about:**
• Specific medicine names (e.g., 'Tell me about Augmentin')
• Symptoms (e.g., 'Medicine for headache')
• Conditions (e.g., 'Treatment for bacterial infections')
• Side effects (e.g., 'Side effects of Azithral')
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Composition,
    Uses,
    SideEffects,
    Storage,
}

impl Section {
    fn included_for(self, intent: QueryIntent) -> bool {
        match intent {
            QueryIntent::Composition => self == Section::Composition,
            QueryIntent::Usage => self == Section::Uses,
            QueryIntent::SideEffects => self == Section::SideEffects,
            QueryIntent::Storage => self == Section::Storage,
            QueryIntent::Dosage | QueryIntent::Interaction | QueryIntent::General => true,
        }
    }
}

const SECTIONS: [Section; 4] = [
    Section::Composition,
    Section::Uses,
    Section::SideEffects,
    Section::Storage,
];

/// Renders answers as lightweight markdown: `##` titles, `**bold**` headings
/// and `•` bullets. Output is not HTML-escaped.
#[derive(Debug, Clone, Default)]
pub struct ResponseComposer {
    options: ComposerOptions,
}

impl ResponseComposer {
    pub fn new(options: ComposerOptions) -> Self {
        Self { options }
    }

    /// Without a match the fixed no-information message is returned and
    /// enrichment is ignored.
    pub fn compose(
        &self,
        matched: Option<&MedicineMatch<'_>>,
        enrichment: Option<&EnrichmentResult>,
        intent: QueryIntent,
    ) -> String {
        let Some(matched) = matched else {
            return NO_MATCH_MESSAGE.to_string();
        };
        let record = matched.record;

        let mut response = format!("## {}\n\n", record.name);
        for section in SECTIONS {
            if section.included_for(intent) {
                response.push_str(&render_section(section, record));
            }
        }
        response.push_str(&format!("**Manufacturer:** {}\n\n", record.manufacturer));

        let absent = EnrichmentResult::absent();
        let enrichment = enrichment.unwrap_or(&absent);
        response.push_str("### FDA Information\n\n");
        response.push_str(&format!(
            "**FDA Indications:** {}\n\n",
            self.fda_text(enrichment.indications.as_deref())
        ));
        response.push_str(&format!(
            "**FDA Adverse Reactions:** {}\n\n",
            self.fda_text(enrichment.adverse_reactions.as_deref())
        ));
        if let Some(warnings) = enrichment.warnings.as_deref() {
            response.push_str(&format!(
                "**FDA Warnings:** {}\n\n",
                self.fda_text(Some(warnings))
            ));
        }

        if self.options.show_confidence {
            response.push_str(&format!("*Confidence: {}%*", confidence_percent(matched.score)));
        }

        response.trim_end().to_string()
    }

    /// "You might also be interested in" block for runner-up matches.
    pub fn render_alternatives(&self, alternatives: &[MedicineMatch<'_>]) -> String {
        if alternatives.is_empty() {
            return String::new();
        }

        let mut block = String::from("### You might also be interested in:\n");
        for alternative in alternatives {
            block.push_str(&format!(
                "• **{}** - {}\n",
                alternative.record.name,
                truncate_chars(&alternative.record.uses, self.options.alternative_max_chars)
            ));
        }
        block
    }

    fn fda_text(&self, text: Option<&str>) -> String {
        match text {
            Some(text) => truncate_chars(text, self.options.fda_max_chars),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}

fn render_section(section: Section, record: &MedicineRecord) -> String {
    match section {
        Section::Composition => format!("**Composition:** {}\n\n", record.composition),
        Section::Uses => format!("**Uses:** {}\n\n", record.uses),
        Section::SideEffects => {
            let items = list_items(&record.side_effects);
            if items.len() > 1 {
                let bullets: String = items.iter().map(|item| format!("• {item}\n")).collect();
                format!("**Side Effects:**\n{bullets}\n")
            } else {
                format!("**Side Effects:** {}\n\n", record.side_effects)
            }
        }
        Section::Storage => format!(
            "**Storage:** {} at {}°C, {}% humidity\n\n",
            record.storage_condition, record.storage_temperature_c, record.storage_humidity_percent
        ),
    }
}

/// Splits a list-shaped field. Comma or semicolon separated values split on
/// the separator; otherwise a new item starts at every capitalised word, which
/// is how the dataset packs side effects ("Vomiting Nausea Abdominal pain").
/// Acronyms and codes such as "SGPT" or "B12" continue the current item.
pub fn list_items(field: &str) -> Vec<String> {
    if field.contains([',', ';']) {
        return field
            .split([',', ';'])
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
    }

    let mut items: Vec<String> = Vec::new();
    for word in field.split_whitespace() {
        let starts_item = starts_capitalised_word(word);
        match items.last_mut() {
            Some(current) if !starts_item => {
                current.push(' ');
                current.push_str(word);
            }
            _ => items.push(word.to_string()),
        }
    }
    items
}

fn starts_capitalised_word(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(first), Some(second)) if first.is_uppercase() && second.is_lowercase()
    )
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars).collect();
    format!("{}...", kept.trim_end())
}

fn confidence_percent(score: f64) -> u32 {
    (score.clamp(0.0, 1.0) * 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample_table;

    fn augmentin_match(record: &MedicineRecord) -> MedicineMatch<'_> {
        MedicineMatch {
            row: 0,
            score: 0.4927,
            record,
        }
    }

    #[test]
    fn no_match_returns_fixed_message() {
        let composer = ResponseComposer::default();
        let enrichment = EnrichmentResult {
            indications: Some("Should never be shown".to_string()),
            ..EnrichmentResult::default()
        };

        for intent in [QueryIntent::General, QueryIntent::Usage] {
            let answer = composer.compose(None, Some(&enrichment), intent);
            assert_eq!(answer, NO_MATCH_MESSAGE);
            assert!(!answer.contains("FDA"));
        }
        assert_eq!(composer.compose(None, None, QueryIntent::General), NO_MATCH_MESSAGE);
    }

    #[test]
    fn absent_enrichment_renders_not_available() {
        let table = sample_table();
        let matched = augmentin_match(&table.records()[0]);
        let composer = ResponseComposer::default();

        for enrichment in [Some(EnrichmentResult::absent()), None] {
            let answer = composer.compose(Some(&matched), enrichment.as_ref(), QueryIntent::General);
            assert!(answer.contains("**FDA Indications:** Not available"));
            assert!(answer.contains("**FDA Adverse Reactions:** Not available"));
            assert!(!answer.contains("FDA Warnings"));
        }
    }

    #[test]
    fn general_intent_renders_every_section() {
        let table = sample_table();
        let matched = augmentin_match(&table.records()[0]);
        let answer = ResponseComposer::default().compose(Some(&matched), None, QueryIntent::General);

        assert!(answer.starts_with("## Augmentin 625 Duo\n\n"));
        assert!(answer.contains("**Composition:** Amoxycillin (500mg) + Clavulanic Acid (125mg)"));
        assert!(answer.contains("**Uses:** Treatment of Bacterial infections"));
        assert!(answer.contains(
            "**Side Effects:**\n• Vomiting\n• Nausea\n• Diarrhea\n• Mucocutaneous candidiasis\n"
        ));
        assert!(answer.contains("**Storage:** Store below 25°C at 25°C, 60% humidity"));
        assert!(answer.contains("**Manufacturer:** Glaxo SmithKline Pharmaceuticals Ltd"));
        assert!(answer.ends_with("*Confidence: 49%*"));
    }

    #[test]
    fn focused_intent_limits_sections() {
        let table = sample_table();
        let matched = augmentin_match(&table.records()[0]);
        let answer = ResponseComposer::default().compose(Some(&matched), None, QueryIntent::Usage);

        assert!(answer.contains("**Uses:** Treatment of Bacterial infections"));
        assert!(!answer.contains("**Composition:**"));
        assert!(!answer.contains("**Side Effects:**"));
        assert!(!answer.contains("**Storage:**"));
        assert!(answer.contains("**Manufacturer:**"));
        assert!(answer.contains("### FDA Information"));
    }

    #[test]
    fn fda_text_is_truncated() {
        let table = sample_table();
        let matched = augmentin_match(&table.records()[0]);
        let composer = ResponseComposer::new(ComposerOptions {
            fda_max_chars: 10,
            show_confidence: false,
            ..ComposerOptions::default()
        });
        let enrichment = EnrichmentResult {
            indications: Some("Amoxicillin and clavulanate potassium tablets".to_string()),
            adverse_reactions: Some("Diarrhea".to_string()),
            warnings: Some("Serious anaphylactic reactions".to_string()),
        };

        let answer = composer.compose(Some(&matched), Some(&enrichment), QueryIntent::Usage);
        assert!(answer.contains("**FDA Indications:** Amoxicilli..."));
        assert!(answer.contains("**FDA Adverse Reactions:** Diarrhea"));
        assert!(answer.contains("**FDA Warnings:** Serious an..."));
        assert!(!answer.contains("Confidence"));
    }

    #[test]
    fn single_item_side_effects_stay_inline() {
        let table = sample_table();
        let mut record = table.records()[0].clone();
        record.side_effects = "Mild headache".to_string();
        let matched = augmentin_match(&record);

        let answer =
            ResponseComposer::default().compose(Some(&matched), None, QueryIntent::SideEffects);
        assert!(answer.contains("**Side Effects:** Mild headache"));
    }

    #[test]
    fn list_items_split_on_separators_or_capitals() {
        assert_eq!(list_items("Nausea, Heartburn ;Rash"), vec!["Nausea", "Heartburn", "Rash"]);
        assert_eq!(
            list_items("Vomiting Nausea Abdominal pain Diarrhea"),
            vec!["Vomiting", "Nausea", "Abdominal pain", "Diarrhea"]
        );
        assert_eq!(
            list_items("Vitamin B12 deficiency Increased SGPT Rash"),
            vec!["Vitamin B12 deficiency", "Increased SGPT", "Rash"]
        );
    }

    #[test]
    fn alternatives_list_truncated_uses() {
        let table = sample_table();
        let composer = ResponseComposer::new(ComposerOptions {
            alternative_max_chars: 12,
            ..ComposerOptions::default()
        });
        let alternatives = [MedicineMatch {
            row: 1,
            score: 0.3,
            record: &table.records()[1],
        }];

        assert_eq!(
            composer.render_alternatives(&alternatives),
            "### You might also be interested in:\n• **Azithral 500** - Treatment of...\n"
        );
        assert!(composer.render_alternatives(&[]).is_empty());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("25°C storage", 3), "25°...");
        assert_eq!(truncate_chars("short", 10), "short");
    }
}
