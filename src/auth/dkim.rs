use futures_util::future::join_all;

use super::{
    CheckOptions, DkimStrategy, RawAnswer, RecordEvaluation, RecordKind,
    resolver::{LookupTxt, fqdn, lookup_or_empty},
};

/// Looks for a published key under each configured selector.
///
/// The winning selector is the first one, in list order, with at least one
/// TXT answer. Both strategies return the same result whatever the order in
/// which the lookups complete.
pub(crate) async fn evaluate<R>(
    resolver: &R,
    ascii_domain: &str,
    options: &CheckOptions,
) -> RecordEvaluation
where
    R: LookupTxt,
{
    let selectors = options.dkim_selectors();
    let found = match options.dkim_strategy() {
        DkimStrategy::Sequential => first_hit_sequential(resolver, ascii_domain, options).await,
        DkimStrategy::Concurrent => {
            let timeout = options.timeout();
            let mut lookups = Vec::with_capacity(selectors.len());
            for selector in selectors {
                let name = selector_name(selector, ascii_domain);
                lookups.push(async move { lookup_or_empty(resolver, &name, timeout).await });
            }
            let answers = join_all(lookups).await;
            first_hit(selectors, &answers).map(str::to_string)
        }
    };

    match found {
        Some(selector) => {
            RecordEvaluation::valid(RecordKind::Dkim, format!("Selector: {selector} (found)"))
        }
        None => RecordEvaluation::missing(
            RecordKind::Dkim,
            "No DKIM records found with common selectors",
            vec![
                "Set up DKIM signing for your email service".to_string(),
                format!("Common selectors checked: {}", describe_selectors(selectors)),
            ],
        ),
    }
}

/// Applies the priority rule over answers collected in selector order.
pub(crate) fn first_hit<'a>(selectors: &'a [String], answers: &[Vec<RawAnswer>]) -> Option<&'a str> {
    selectors
        .iter()
        .zip(answers)
        .find(|(_, answers)| !answers.is_empty())
        .map(|(selector, _)| selector.as_str())
}

async fn first_hit_sequential<R>(
    resolver: &R,
    ascii_domain: &str,
    options: &CheckOptions,
) -> Option<String>
where
    R: LookupTxt,
{
    for selector in options.dkim_selectors() {
        let name = selector_name(selector, ascii_domain);
        if !lookup_or_empty(resolver, &name, options.timeout())
            .await
            .is_empty()
        {
            return Some(selector.clone());
        }
    }
    None
}

fn selector_name(selector: &str, ascii_domain: &str) -> String {
    fqdn(&format!("{selector}._domainkey"), ascii_domain)
}

fn describe_selectors(selectors: &[String]) -> String {
    if selectors.is_empty() {
        "none".to_string()
    } else {
        selectors.join(", ")
    }
}
