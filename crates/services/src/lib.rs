#![forbid(unsafe_code)]

pub mod ai;
pub mod auth;
pub mod backend;
pub mod error;
pub mod generator;
pub mod mindmap;
pub mod oracle;
pub mod plans;
pub mod quiz;

pub use quiz_core::Clock;

pub use ai::{AiClient, AiConfig};
pub use auth::{Account, AuthGateway, HttpAuthGateway};
pub use backend::BackendConfig;
pub use error::{
    AiClientError, AuthError, GeneratorError, MindMapError, OracleError, PlanStoreError,
    QuizFlowError,
};
pub use generator::{AiQuestionGenerator, GenerateRequest, QuestionGenerator, TypeMix};
pub use mindmap::{HttpMindMapRenderer, MindMapRenderer};
pub use oracle::{AiAnswerOracle, AnswerOracle};
pub use plans::{HttpPlanStore, Plan, PlanStore};
pub use quiz::{CheckReply, QuizFlow, RevealedAnswer};
