//! Greedy token-budget filter: traverse a ranked list in
//! order, keeping each item while the running token sum stays within
//! `max_tokens`. The first item is always kept, even alone over budget,
//! so a successful query never comes back empty.

use hindsight_tokens::Tokenizer;

/// `text_of` extracts the text to count from each item; this is generic
/// so the same greedy rule serves both `MemoryUnit` results and entity-observation attachment.
pub fn filter_to_budget<T>(
    items: Vec<T>,
    max_tokens: usize,
    tokenizer: &dyn Tokenizer,
    text_of: impl Fn(&T) -> &str,
) -> Vec<T> {
    let mut kept = Vec::with_capacity(items.len());
    let mut running = 0usize;
    for (idx, item) in items.into_iter().enumerate() {
        let cost = tokenizer.count(text_of(&item));
        if idx == 0 {
            kept.push(item);
            running = cost;
            continue;
        }
        if running + cost > max_tokens {
            break;
        }
        running += cost;
        kept.push(item);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindsight_tokens::TiktokenTokenizer;

    #[test]
    fn first_item_survives_even_when_alone_over_budget() {
        let tokenizer = TiktokenTokenizer::new();
        let items = vec!["a very long sentence that certainly exceeds one token".to_string()];
        let kept = filter_to_budget(items.clone(), 1, &tokenizer, |s: &String| s.as_str());
        assert_eq!(kept, items);
    }

    #[test]
    fn stops_at_first_item_that_would_overflow() {
        let tokenizer = TiktokenTokenizer::new();
        let items = vec!["one".to_string(), "two three four five six seven eight".to_string(), "nine".to_string()];
        let kept = filter_to_budget(items, 2, &tokenizer, |s: &String| s.as_str());
        assert_eq!(kept, vec!["one".to_string()]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let tokenizer = TiktokenTokenizer::new();
        let kept: Vec<String> = filter_to_budget(Vec::new(), 100, &tokenizer, |s: &String| s.as_str());
        assert!(kept.is_empty());
    }

    #[test]
    fn exact_boundary_is_included() {
        let tokenizer = TiktokenTokenizer::new();
        let items = vec!["alpha".to_string(), "beta".to_string()];
        let exact = tokenizer.count("alpha") + tokenizer.count("beta");
        let kept = filter_to_budget(items.clone(), exact, &tokenizer, |s: &String| s.as_str());
        assert_eq!(kept, items);
    }
}
