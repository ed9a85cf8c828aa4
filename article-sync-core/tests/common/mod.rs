#![allow(dead_code)]

use std::collections::HashMap;

use article_sync_core::contract::MockPrompter;
use article_sync_core::{Article, ServiceCredentials};
use chrono::{TimeZone, Utc};

pub const SERVICE_URL: &str = "https://cms.example.com";

pub fn credentials() -> ServiceCredentials {
    ServiceCredentials {
        username: "jane".into(),
        password: "secret".into(),
        service_url: SERVICE_URL.into(),
        auth_key: "auth-key".into(),
    }
}

pub fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// An article with every field populated.
pub fn complete_article() -> Article {
    Article {
        id: "a1".into(),
        title: "Hello".into(),
        url: "/hello".into(),
        banner: format!("{SERVICE_URL}/images/img1"),
        publish_date: Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap(),
        data_source: "hello.md".into(),
        author: "Jane".into(),
        categories: list(&["a", "b"]),
        tags: list(&["x"]),
        content: "Body text".into(),
    }
}

/// A prompter that answers string prompts from `answers` and accepts the
/// default for everything else.
pub fn scripted_prompter(answers: &[(&str, &str)]) -> MockPrompter {
    let answers: HashMap<String, String> = answers
        .iter()
        .map(|(prompt, answer)| (prompt.to_string(), answer.to_string()))
        .collect();

    let mut prompter = MockPrompter::new();
    prompter
        .expect_ask_string()
        .returning(move |prompt, default, _| {
            Ok(answers
                .get(prompt)
                .cloned()
                .unwrap_or_else(|| default.to_string()))
        });
    prompter.expect_ask_date().returning(|_, default| Ok(default));
    prompter
        .expect_ask_csv()
        .returning(|_, default| Ok(default.to_vec()));
    prompter
}
