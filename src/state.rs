use crate::analysis::services::NutritionAnalyzer;
use crate::config::AppConfig;
use crate::inference::{GeminiClient, InferenceClient};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub analyzer: Arc<NutritionAnalyzer>,
}

impl AppState {
    pub fn init(config: AppConfig) -> Self {
        let inference = Arc::new(GeminiClient::new(&config.gemini)) as Arc<dyn InferenceClient>;
        Self::from_parts(Arc::new(config), inference)
    }

    pub fn from_parts(config: Arc<AppConfig>, inference: Arc<dyn InferenceClient>) -> Self {
        Self {
            config,
            analyzer: Arc::new(NutritionAnalyzer::new(inference)),
        }
    }
}

#[cfg(test)]
pub(crate) use fake::CannedInference;
