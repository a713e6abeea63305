//! Prompts sent to the oracle

use kizuna_domain::taxonomy::vocabulary;
use kizuna_domain::{Character, CharacterPair};

/// Build the relationship prompt for a pair and an episode synopsis
pub fn relationship_prompt(pair: &CharacterPair, synopsis: &str) -> String {
    let (a, b) = (&pair.first, &pair.second);
    let tags = vocabulary().collect::<Vec<_>>().join(", ");

    format!(
        "List only valid relationship tags for {a} and {b} from this episode: \"{synopsis}\". \
         Return only a comma-separated list of predefined relationship tags: {tags}. \
         Do not include any other words, descriptions, or additional information. \
         Only return tags relevant to the relationship between {a} and {b}."
    )
}

/// Build the attribute prompt for one character and one category
pub fn attribute_prompt(character: &Character, category: &str, labels: &[String]) -> String {
    format!(
        "Identify the {category} of {character}. Choose only from this predefined list: {}. \
         Return only the name of the {category}, nothing else. \
         If no {category} applies, return 'None'.",
        labels.join(", ")
    )
}
