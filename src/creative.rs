use crate::error::{ensure_records, AnalysisError, Stage};
use crate::models::{CampaignSuggestion, CreativeInsights, Record, ValidatedHypothesis};
use crate::stats;

const TOP_PERFORMERS: usize = 10;
const MAX_CTAS: usize = 5;
const CAMPAIGNS_TO_REFRESH: usize = 3;
const IDEAS_PER_CAMPAIGN: usize = 4;
const THEME_SHARE: f64 = 0.2;

pub const CTA_PHRASES: [&str; 6] = [
    "buy now",
    "shop now",
    "order now",
    "discover",
    "learn more",
    "sign up",
];

pub const THEMES: [(&str, &[&str]); 4] = [
    ("comfort", &["comfort", "soft", "smooth", "comfortable"]),
    ("quality", &["premium", "quality", "durable", "best"]),
    ("value", &["sale", "deal", "offer", "discount", "save"]),
    ("urgency", &["limited", "today", "now", "while supplies"]),
];

pub const TESTING_IDEAS: [&str; 3] = [
    "Test new call-to-actions against current ones",
    "Try time-limited offers and urgency",
    "Experiment with different ad layouts",
];

/// Creative messages of the highest-roas records, best first.
pub fn top_messages(records: &[Record]) -> Vec<String> {
    let mut ranked: Vec<&Record> = records.iter().collect();
    ranked.sort_by(|a, b| b.roas.total_cmp(&a.roas));
    ranked
        .into_iter()
        .take(TOP_PERFORMERS)
        .filter_map(|record| record.creative_message.clone())
        .filter(|message| !message.trim().is_empty())
        .collect()
}

/// Calls-to-action found in `messages`, lowercased and in first-seen order.
pub fn extract_ctas(messages: &[String]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    for message in messages {
        let lowered = message.to_lowercase();
        let mut hits: Vec<(usize, &str)> = CTA_PHRASES
            .iter()
            .flat_map(|phrase| lowered.match_indices(phrase))
            .collect();
        hits.sort_by_key(|(position, _)| *position);

        for (_, phrase) in hits {
            if !found.iter().any(|existing| existing == phrase) {
                found.push(phrase.to_string());
            }
        }
    }

    found.truncate(MAX_CTAS);
    found
}

/// Themes present in more than a fifth of `messages`.
pub fn extract_themes(messages: &[String]) -> Vec<String> {
    let lowered: Vec<String> = messages.iter().map(|m| m.to_lowercase()).collect();
    let threshold = lowered.len() as f64 * THEME_SHARE;

    THEMES
        .iter()
        .filter(|(_, keywords)| {
            let matches = lowered
                .iter()
                .filter(|message| keywords.iter().any(|keyword| message.contains(keyword)))
                .count();
            matches as f64 > threshold
        })
        .map(|(theme, _)| theme.to_string())
        .collect()
}

fn title_case(phrase: &str) -> String {
    phrase
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Candidate ad texts built from the learned themes and calls-to-action,
/// falling back to stock words when too few were learned.
pub fn ad_ideas(themes: &[String], ctas: &[String]) -> Vec<String> {
    let theme = |index: usize, fallback: &str| {
        themes
            .get(index)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    };
    let cta = |index: usize, fallback: &str| {
        ctas.get(index)
            .map(|phrase| title_case(phrase))
            .unwrap_or_else(|| fallback.to_string())
    };

    let templates = [
        format!(
            "Experience amazing {}. {}!",
            theme(0, "comfort"),
            cta(0, "Shop Now")
        ),
        format!(
            "Special {} offer. {}!",
            theme(1, "limited-time"),
            cta(1, "Buy Today")
        ),
        format!(
            "Find your perfect {} for daily wear. {}!",
            theme(0, "fit"),
            cta(0, "Order Now")
        ),
        format!(
            "Top-notch {} you'll enjoy. {}!",
            theme(0, "quality"),
            cta(0, "Shop Today")
        ),
        format!(
            "Check out our {} collection. {}!",
            theme(1, "new"),
            cta(1, "Discover More")
        ),
    ];

    templates.into_iter().take(IDEAS_PER_CAMPAIGN).collect()
}

/// Learns what the best ads say and drafts replacements for the weakest
/// click-through campaigns.
pub fn synthesize(
    records: &[Record],
    hypotheses: &[ValidatedHypothesis],
) -> Result<CreativeInsights, AnalysisError> {
    ensure_records(Stage::CreativeSynthesis, records)?;

    let messages = top_messages(records);
    let effective_ctas = extract_ctas(&messages);
    let popular_themes = extract_themes(&messages);

    let suggestions = stats::lowest_ctr(&stats::by_campaign(records), CAMPAIGNS_TO_REFRESH)
        .into_iter()
        .map(|campaign| CampaignSuggestion {
            ad_options: ad_ideas(&popular_themes, &effective_ctas),
            campaign_name: campaign.campaign_name,
            current_ctr: campaign.mean_ctr,
        })
        .collect();

    Ok(CreativeInsights {
        effective_ctas,
        popular_themes,
        suggestions,
        testing_ideas: TESTING_IDEAS.iter().map(|idea| idea.to_string()).collect(),
        responds_to: hypotheses
            .iter()
            .filter(|validated| validated.accepted)
            .map(|validated| validated.hypothesis.name.clone())
            .collect(),
    })
}
