//! The cricket team's staff agents.
//!
//! Each role exposes exactly one operation. Operations take a single named
//! string argument, format it into a prompt, and ask the model under the
//! role's preamble.

use std::fmt;
use std::str::FromStr;

use dugout_core::agent::{Agent, require_str};
use dugout_core::llm::PromptEngine;
use dugout_types::agent::AgentProfile;
use dugout_types::error::AgentError;
use dugout_types::task::TaskArguments;

/// Argument carrying the fixture description.
pub const MATCH_INFO: &str = "match_info";
/// Argument carrying the player (or squad) name.
pub const PLAYER_NAME: &str = "player_name";

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CricketOperation {
    PlanStrategy,
    TrainBatting,
    TrainBowling,
    ProvideFitnessPlan,
    ReportPerformance,
}

impl CricketOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            CricketOperation::PlanStrategy => "plan_strategy",
            CricketOperation::TrainBatting => "train_batting",
            CricketOperation::TrainBowling => "train_bowling",
            CricketOperation::ProvideFitnessPlan => "provide_fitness_plan",
            CricketOperation::ReportPerformance => "report_performance",
        }
    }

    /// Name of the single argument this operation reads.
    pub fn argument(self) -> &'static str {
        match self {
            CricketOperation::PlanStrategy => MATCH_INFO,
            _ => PLAYER_NAME,
        }
    }

    fn prompt(self, input: &str) -> String {
        match self {
            CricketOperation::PlanStrategy => format!("Plan a strategy for this match: {input}"),
            CricketOperation::TrainBatting => {
                format!("Provide batting training and improvement tips for: {input}")
            }
            CricketOperation::TrainBowling => {
                format!("Provide bowling training and improvement tips for: {input}")
            }
            CricketOperation::ProvideFitnessPlan => {
                format!("Provide fitness, recovery, and injury prevention plan for: {input}")
            }
            CricketOperation::ReportPerformance => {
                format!("Report performance, improvements, and feedback for: {input}")
            }
        }
    }
}

impl fmt::Display for CricketOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CricketOperation {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plan_strategy" => Ok(CricketOperation::PlanStrategy),
            "train_batting" => Ok(CricketOperation::TrainBatting),
            "train_bowling" => Ok(CricketOperation::TrainBowling),
            "provide_fitness_plan" => Ok(CricketOperation::ProvideFitnessPlan),
            "report_performance" => Ok(CricketOperation::ReportPerformance),
            other => Err(AgentError::UnknownOperation(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CricketRole {
    HeadCoach,
    BattingCoach,
    BowlingCoach,
    HeadPhysio,
    Player,
}

impl CricketRole {
    pub const ALL: [CricketRole; 5] = [
        CricketRole::HeadCoach,
        CricketRole::BattingCoach,
        CricketRole::BowlingCoach,
        CricketRole::HeadPhysio,
        CricketRole::Player,
    ];

    /// Registry key.
    pub fn kind(self) -> &'static str {
        match self {
            CricketRole::HeadCoach => "head_coach",
            CricketRole::BattingCoach => "batting_coach",
            CricketRole::BowlingCoach => "bowling_coach",
            CricketRole::HeadPhysio => "head_physio",
            CricketRole::Player => "player",
        }
    }

    pub fn operation(self) -> CricketOperation {
        match self {
            CricketRole::HeadCoach => CricketOperation::PlanStrategy,
            CricketRole::BattingCoach => CricketOperation::TrainBatting,
            CricketRole::BowlingCoach => CricketOperation::TrainBowling,
            CricketRole::HeadPhysio => CricketOperation::ProvideFitnessPlan,
            CricketRole::Player => CricketOperation::ReportPerformance,
        }
    }

    fn operation_names(self) -> &'static [&'static str] {
        match self {
            CricketRole::HeadCoach => &["plan_strategy"],
            CricketRole::BattingCoach => &["train_batting"],
            CricketRole::BowlingCoach => &["train_bowling"],
            CricketRole::HeadPhysio => &["provide_fitness_plan"],
            CricketRole::Player => &["report_performance"],
        }
    }

    fn preamble(self) -> &'static str {
        match self {
            CricketRole::HeadCoach => {
                "You are the Head Coach of a cricket team. Your role is to:\n\
                 - Plan strategies for matches\n\
                 - Analyze opponent teams\n\
                 - Guide and motivate players\n\
                 - Provide comprehensive game plans"
            }
            CricketRole::BattingCoach => {
                "You are the Batting Coach. Your role is to:\n\
                 - Improve batting techniques\n\
                 - Suggest training drills\n\
                 - Analyze batting weaknesses and strengths"
            }
            CricketRole::BowlingCoach => {
                "You are the Bowling Coach. Your role is to:\n\
                 - Analyze bowling performance\n\
                 - Suggest improvement drills\n\
                 - Develop bowling strategies"
            }
            CricketRole::HeadPhysio => {
                "You are the Head Physio. Your role is to:\n\
                 - Assess player fitness\n\
                 - Suggest injury prevention and recovery plans\n\
                 - Monitor health status of players"
            }
            CricketRole::Player => {
                "You are a cricket player. Your role is to:\n\
                 - Execute batting, bowling, and fielding skills\n\
                 - Report personal performance\n\
                 - Provide feedback on training"
            }
        }
    }

    /// Display catalog entry.
    pub fn profile(self) -> AgentProfile {
        let (name, role, description, capabilities): (&str, &str, &str, [&str; 4]) = match self {
            CricketRole::HeadCoach => (
                "Head Coach",
                "Strategic Planning & Team Guidance",
                "Plans strategies, analyzes opponents, and guides the team",
                [
                    "Match Strategy Planning",
                    "Opponent Analysis",
                    "Team Motivation",
                    "Game Plan Development",
                ],
            ),
            CricketRole::BattingCoach => (
                "Batting Coach",
                "Batting Excellence",
                "Improves batting performance and provides training routines",
                [
                    "Technique Improvement",
                    "Training Drills",
                    "Weakness Analysis",
                    "Performance Enhancement",
                ],
            ),
            CricketRole::BowlingCoach => (
                "Bowling Coach",
                "Bowling Mastery",
                "Analyzes bowling performance and provides expert coaching",
                [
                    "Performance Analysis",
                    "Skill Development",
                    "Strategy Design",
                    "Technical Guidance",
                ],
            ),
            CricketRole::HeadPhysio => (
                "Head Physio",
                "Health & Fitness",
                "Monitors fitness, recovery and injury prevention",
                [
                    "Fitness Assessment",
                    "Injury Prevention",
                    "Recovery Plans",
                    "Health Monitoring",
                ],
            ),
            CricketRole::Player => (
                "Player",
                "Performance Execution",
                "Executes skills and reports performance feedback",
                [
                    "Skill Execution",
                    "Performance Reporting",
                    "Training Feedback",
                    "Self-Assessment",
                ],
            ),
        };

        let operation = self.operation();
        AgentProfile {
            kind: self.kind().to_string(),
            name: name.to_string(),
            role: role.to_string(),
            description: description.to_string(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            operations: vec![operation.as_str().to_string()],
            default_operation: operation.as_str().to_string(),
            input_argument: operation.argument().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// One member of the team's staff, answering through the prompt engine.
#[derive(Debug, Clone)]
pub struct CricketAgent {
    role: CricketRole,
    engine: PromptEngine,
}

impl CricketAgent {
    pub fn new(role: CricketRole, engine: PromptEngine) -> Self {
        Self { role, engine }
    }

    pub fn role(&self) -> CricketRole {
        self.role
    }
}

impl Agent for CricketAgent {
    fn kind(&self) -> &str {
        self.role.kind()
    }

    fn operations(&self) -> &'static [&'static str] {
        self.role.operation_names()
    }

    async fn invoke(&self, operation: &str, arguments: &TaskArguments) -> Result<String, AgentError> {
        let op: CricketOperation = operation.parse()?;
        if op != self.role.operation() {
            return Err(AgentError::UnknownOperation(operation.to_string()));
        }

        let input = require_str(arguments, op.argument())?;
        tracing::debug!(agent_kind = self.role.kind(), operation = %op, "prompting model");
        Ok(self.engine.ask(self.role.preamble(), op.prompt(input)).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use dugout_core::llm::{BoxLlmProvider, LlmProvider, PromptSettings};
    use dugout_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

    #[derive(Clone, Default)]
    struct EchoProvider {
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(CompletionResponse {
                id: "1".to_string(),
                content: request.messages[0].content.clone(),
                model: request.model.clone(),
                usage: Usage::default(),
            })
        }
    }

    fn agent(role: CricketRole) -> (CricketAgent, Arc<Mutex<Vec<CompletionRequest>>>) {
        let provider = EchoProvider::default();
        let requests = provider.requests.clone();
        let engine = PromptEngine::new(
            Arc::new(BoxLlmProvider::new(provider)),
            PromptSettings {
                model: "llama-3.3-70b-versatile".to_string(),
                max_tokens: 1024,
                temperature: None,
            },
        );
        (CricketAgent::new(role, engine), requests)
    }

    fn args(name: &str, value: &str) -> TaskArguments {
        let mut args = TaskArguments::new();
        args.insert(name.to_string(), serde_json::json!(value));
        args
    }

    #[tokio::test]
    async fn head_coach_plans_strategy() {
        let (coach, requests) = agent(CricketRole::HeadCoach);
        let out = coach
            .invoke("plan_strategy", &args(MATCH_INFO, "India vs Australia, Perth"))
            .await
            .unwrap();

        assert_eq!(out, "Plan a strategy for this match: India vs Australia, Perth");
        let sent = requests.lock().unwrap();
        assert!(sent[0].system.as_deref().unwrap().starts_with("You are the Head Coach"));
    }

    #[tokio::test]
    async fn each_role_uses_its_own_prompt() {
        let cases = [
            (CricketRole::BattingCoach, "Provide batting training and improvement tips for: Gill"),
            (CricketRole::BowlingCoach, "Provide bowling training and improvement tips for: Gill"),
            (
                CricketRole::HeadPhysio,
                "Provide fitness, recovery, and injury prevention plan for: Gill",
            ),
            (CricketRole::Player, "Report performance, improvements, and feedback for: Gill"),
        ];
        for (role, expected) in cases {
            let (staff, _) = agent(role);
            let op = role.operation().as_str();
            let out = staff.invoke(op, &args(PLAYER_NAME, "Gill")).await.unwrap();
            assert_eq!(out, expected);
        }
    }

    #[tokio::test]
    async fn other_roles_operations_are_unknown() {
        let (coach, requests) = agent(CricketRole::BattingCoach);
        let err = coach
            .invoke("train_bowling", &args(PLAYER_NAME, "Gill"))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::UnknownOperation(op) if op == "train_bowling"));

        let err = coach.invoke("sledge", &TaskArguments::new()).await.unwrap_err();
        assert!(matches!(err, AgentError::UnknownOperation(_)));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_argument_is_reported() {
        let (physio, _) = agent(CricketRole::HeadPhysio);
        let err = physio
            .invoke("provide_fitness_plan", &args(MATCH_INFO, "wrong arg"))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::MissingArgument(name) if name == PLAYER_NAME));
    }

    #[test]
    fn operation_names_round_trip_through_from_str() {
        for role in CricketRole::ALL {
            let names = role.operation_names();
            assert_eq!(names.len(), 1);
            assert_eq!(names[0].parse::<CricketOperation>().unwrap(), role.operation());
        }
    }

    #[test]
    fn profiles_match_catalog() {
        let profile = CricketRole::HeadCoach.profile();
        assert_eq!(profile.name, "Head Coach");
        assert_eq!(profile.role, "Strategic Planning & Team Guidance");
        assert_eq!(profile.capabilities.len(), 4);
        assert_eq!(profile.default_operation, "plan_strategy");
        assert_eq!(profile.input_argument, "match_info");

        let profile = CricketRole::Player.profile();
        assert_eq!(profile.kind, "player");
        assert_eq!(profile.input_argument, "player_name");
    }
}
