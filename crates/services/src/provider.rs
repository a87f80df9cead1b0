use async_trait::async_trait;
use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use trivia_core::model::Question;

use crate::error::ProviderError;

/// Questions requested per batch when the caller does not say otherwise.
pub const DEFAULT_QUESTION_AMOUNT: u8 = 20;

const DEFAULT_BASE_URL: &str = "https://opentdb.com/api.php";

/// Source of normalized trivia questions.
///
/// Injected into [`QuizService`](crate::quiz_service::QuizService) so tests
/// can substitute a fake. Implementations are stateless with respect to the
/// session: no caching, no retries; retry is the caller's responsibility.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Fetch `amount` questions, shuffled and entity-decoded.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the request cannot be built, the
    /// transport fails, the status is not success, or the payload does not
    /// match the expected schema.
    async fn fetch_questions(&self, amount: u8) -> Result<Vec<Question>, ProviderError>;
}

/// Provider backed by the Open Trivia DB HTTP API.
#[derive(Clone)]
pub struct OpenTdbProvider {
    client: Client,
    base_url: String,
}

impl OpenTdbProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    /// Point the provider at a different endpoint. Meant for tests.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_url(&self, amount: u8) -> Result<Url, ProviderError> {
        let url = Url::parse_with_params(
            &self.base_url,
            &[("amount", amount.to_string()), ("type", "multiple".into())],
        )?;
        Ok(url)
    }
}

impl Default for OpenTdbProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionProvider for OpenTdbProvider {
    async fn fetch_questions(&self, amount: u8) -> Result<Vec<Question>, ProviderError> {
        let url = self.request_url(amount)?;
        log::debug!("fetching {amount} questions from {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("trivia endpoint returned {status}");
            return Err(ProviderError::InvalidResponse(status));
        }

        let body = response.text().await?;
        let payload: ApiResponse = serde_json::from_str(&body)?;

        let mut rng = rng();
        let questions = payload
            .results
            .into_iter()
            .map(|raw| normalize_question(raw, &mut rng))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("normalized {} questions", questions.len());
        Ok(questions)
    }
}

//
// ─── WIRE SCHEMA ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct ApiResponse {
    results: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

/// Build a [`Question`] from one raw API item.
///
/// Combines the correct and incorrect answers, shuffles them once, relocates
/// the correct answer, and decodes HTML entities in every text the API may
/// have encoded.
fn normalize_question(raw: RawQuestion, rng: &mut impl Rng) -> Result<Question, ProviderError> {
    let correct = decode_entities(&raw.correct_answer);
    let mut options: Vec<String> = std::iter::once(raw.correct_answer)
        .chain(raw.incorrect_answers)
        .map(|text| decode_entities(&text))
        .collect();
    options.shuffle(rng);

    // The correct answer is always one of the options we just shuffled.
    let correct_index = options
        .iter()
        .position(|option| *option == correct)
        .unwrap_or(0);

    let text = decode_entities(&raw.question);
    Ok(Question::new(text, options, correct_index)?)
}

fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn raw(question: &str, correct: &str, incorrect: [&str; 3]) -> RawQuestion {
        RawQuestion {
            question: question.into(),
            correct_answer: correct.into(),
            incorrect_answers: incorrect.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn request_url_carries_amount_and_type() {
        let provider = OpenTdbProvider::new();
        let url = provider.request_url(20).unwrap();
        assert_eq!(url.host_str(), Some("opentdb.com"));
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("amount".into(), "20".into())));
        assert!(query.contains(&("type".into(), "multiple".into())));
    }

    #[test]
    fn correct_index_survives_shuffle_for_any_seed() {
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let question = normalize_question(
                raw("Q?", "right", ["wrong1", "wrong2", "wrong3"]),
                &mut rng,
            )
            .unwrap();

            assert_eq!(question.options().len(), 4);
            assert_eq!(question.options()[question.correct_index()], "right");
        }
    }

    #[test]
    fn html_entities_are_decoded_in_question_and_options() {
        let mut rng = StdRng::seed_from_u64(1);
        let question = normalize_question(
            raw(
                "Tom &amp; Jerry debuted in which year?",
                "&quot;1940&quot;",
                ["1938", "1945", "&#039;50", ],
            ),
            &mut rng,
        )
        .unwrap();

        assert_eq!(question.text(), "Tom & Jerry debuted in which year?");
        assert!(question.options().iter().any(|option| option == "\"1940\""));
        assert!(question.options().iter().any(|option| option == "'50"));
        assert_eq!(question.options()[question.correct_index()], "\"1940\"");
    }

    #[test]
    fn wrong_incorrect_answer_count_is_a_schema_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let item = RawQuestion {
            question: "Q?".into(),
            correct_answer: "right".into(),
            incorrect_answers: vec!["only one".into()],
        };
        let err = normalize_question(item, &mut rng).unwrap_err();
        assert!(matches!(err, ProviderError::Schema(_)));
    }

    #[test]
    fn payload_schema_mismatch_decodes_as_error() {
        let err = serde_json::from_str::<ApiResponse>("{\"nope\": []}").unwrap_err();
        let err = ProviderError::from(err);
        assert!(matches!(err, ProviderError::Decode(_)));
    }
}
