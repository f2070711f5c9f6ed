use std::sync::Arc;

use tracing::{info, instrument, warn};
use validator::Validate;

use crate::advice::summary;
use crate::error::NutritionError;
use crate::food::{formatter, prompt, validation};
use crate::providers::traits::{AdviceProvider, ImageAnalysisProvider};
use crate::session::{AdviceResult, AnalysisResult, Session};

/// The analyze → advise flow shared by the shell and the HTTP API.
///
/// Each method awaits exactly one external call. Input problems are rejected
/// before anything is sent.
#[derive(Clone)]
pub struct MealWorkflow {
    vision: Arc<dyn ImageAnalysisProvider>,
    advisor: Arc<dyn AdviceProvider>,
}

impl MealWorkflow {
    pub fn new(vision: Arc<dyn ImageAnalysisProvider>, advisor: Arc<dyn AdviceProvider>) -> Self {
        Self { vision, advisor }
    }

    pub fn vision_model(&self) -> String {
        self.vision.get_model_info()
    }

    #[instrument(skip_all, fields(session = %session.id()))]
    pub async fn analyze(&self, session: &mut Session) -> Result<AnalysisResult, NutritionError> {
        let missing = validation::missing_required_fields(&session.profile);
        if !missing.is_empty() {
            return Err(NutritionError::MissingFields(missing));
        }
        session.profile.validate()?;

        let image = session.take_image()?;
        let tdee = session.profile.tdee();
        let composed = prompt::compose(prompt::BASE_PROMPT, &session.profile, tdee);

        info!(model = %self.vision.get_model_info(), %tdee, "analyzing meal photo");
        let raw = match self.vision.analyze_image(&composed, &image).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "meal analysis failed");
                session.analysis_failed();
                session.restore_image(image);
                return Err(e.into());
            }
        };
        drop(image);

        let text = formatter::format(&raw, &session.profile, tdee);
        Ok(session.record_analysis(text).clone())
    }

    /// Advice for the current analysis. A failure leaves the session as it was.
    #[instrument(skip_all, fields(session = %session.id()))]
    pub async fn advise(&self, session: &mut Session) -> Result<AdviceResult, NutritionError> {
        let analysis = session
            .analysis()
            .map(|a| a.text.clone())
            .ok_or(NutritionError::NoAnalysis)?;

        info!("requesting web-augmented advice");
        let raw = self.advisor.advise(&analysis).await.map_err(|e| {
            warn!(error = %e, "advice request failed");
            NutritionError::from(e)
        })?;

        let summary = summary::personalized_summary(&raw, &analysis);
        session.record_advice(raw, summary).cloned()
    }
}
