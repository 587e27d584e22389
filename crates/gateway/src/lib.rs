#![forbid(unsafe_code)]

pub mod collaborators;
pub mod http;

pub use collaborators::{
    AnswerScorer, CompletionReporter, Gateway, GatewayError, InMemoryGateway, QuestionSource,
};
pub use http::{ApiConfig, AuthContext, HttpGateway};
