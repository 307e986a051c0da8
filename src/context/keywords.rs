use std::collections::HashMap;

/// Words that never qualify as a page's dominant keyword.
const STOP_WORDS: [&str; 43] = [
    "the", "of", "and", "a", "an", "to", "for", "in", "on", "at", "by", "with", "from", "your",
    "my", "our", "their", "his", "her", "its", "be", "is", "are", "was", "were", "will", "can",
    "should", "must", "not", "no", "yes", "or", "if", "as", "this", "that", "these", "those",
    "they", "you", "page", "form",
];

/// Most frequent meaningful token across the page's title, headings, URL
/// hints and any extra hint text. Tokens of two characters or fewer and
/// stop words are dropped; ties go to the token seen first. Empty when
/// nothing qualifies.
pub fn dominant_keyword(title: &str, headings: &[String], url_hints: &str, extra: &str) -> String {
    let combined = format!("{}\n{}\n{}\n{}", title, headings.join(" "), url_hints, extra);
    let lowered = combined.to_lowercase();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for token in lowered.split(|c: char| !c.is_alphanumeric()) {
        if token.len() <= 2 || STOP_WORDS.contains(&token) {
            continue;
        }
        let count = counts.entry(token).or_insert(0);
        if *count == 0 {
            order.push(token);
        }
        *count += 1;
    }

    let mut best = "";
    let mut best_count = 0;
    for token in order {
        let count = counts[token];
        if count > best_count {
            best_count = count;
            best = token;
        }
    }
    best.to_string()
}

/// Naturalize a raw field label for speech: collapse separators and
/// whitespace, strip punctuation, title-case. Short labels (two words or
/// fewer) that do not already mention the page keyword get "of <keyword>"
/// appended, so "City" on a permit page reads as "City Of Springfield".
pub fn naturalize_label(label: &str, keyword: &str) -> String {
    let spaced = label.replace(['_', '-'], " ");
    let clean: String = spaced
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    let clean = clean
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let word_count = clean.split_whitespace().count();
    let has_keyword = !keyword.is_empty() && clean.contains(&keyword.to_lowercase());

    if !keyword.is_empty() && !has_keyword && word_count <= 2 && word_count > 0 {
        title_case(&format!("{} of {}", clean, keyword.to_lowercase()))
    } else {
        title_case(&clean)
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
