use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::NutritionError;
use crate::food::{MealImage, UserProfile};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceResult {
    pub raw: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// One user's state. Every change goes through a transition method so the
/// results can never disagree with the inputs they were computed from.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    pub profile: UserProfile,
    image: Option<MealImage>,
    analysis: Option<AnalysisResult>,
    advice: Option<AdviceResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            profile: UserProfile::default(),
            image: None,
            analysis: None,
            advice: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn image(&self) -> Option<&MealImage> {
        self.image.as_ref()
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn advice(&self) -> Option<&AdviceResult> {
        self.advice.as_ref()
    }

    /// A new photo invalidates everything computed from the previous one.
    pub fn attach_image(&mut self, image: MealImage) {
        self.image = Some(image);
        self.analysis = None;
        self.advice = None;
    }

    /// Hands the photo to an analysis request; the session keeps no copy.
    pub fn take_image(&mut self) -> Result<MealImage, NutritionError> {
        self.image.take().ok_or(NutritionError::NoImage)
    }

    /// Gives back a photo whose analysis failed. A photo attached in the
    /// meantime wins.
    pub fn restore_image(&mut self, image: MealImage) {
        self.image.get_or_insert(image);
    }

    pub fn record_analysis(&mut self, text: String) -> &AnalysisResult {
        self.advice = None;
        &*self.analysis.insert(AnalysisResult { text, created_at: Utc::now() })
    }

    pub fn analysis_failed(&mut self) {
        self.analysis = None;
        self.advice = None;
    }

    pub fn record_advice(&mut self, raw: String, summary: String) -> Result<&AdviceResult, NutritionError> {
        if self.analysis.is_none() {
            return Err(NutritionError::NoAnalysis);
        }
        Ok(&*self.advice.insert(AdviceResult { raw, summary, created_at: Utc::now() }))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::meal_image::tests::{jpeg_bytes, png_bytes};

    fn image() -> MealImage {
        MealImage::decode(&png_bytes()).unwrap()
    }

    fn analysed_session() -> Session {
        let mut session = Session::new();
        session.attach_image(image());
        session.take_image().unwrap();
        session.record_analysis("analysis".into());
        session.record_advice("raw".into(), "summary".into()).unwrap();
        session
    }

    #[test]
    fn test_new_image_clears_results() {
        let mut session = analysed_session();
        session.attach_image(image());
        assert!(session.image().is_some());
        assert!(session.analysis().is_none());
        assert!(session.advice().is_none());
    }

    #[test]
    fn test_new_analysis_clears_advice() {
        let mut session = analysed_session();
        let result = session.record_analysis("second".into());
        assert_eq!(result.text, "second");
        assert!(session.advice().is_none());
    }

    #[test]
    fn test_failed_analysis_clears_results() {
        let mut session = analysed_session();
        session.analysis_failed();
        assert!(session.analysis().is_none());
        assert!(session.advice().is_none());
    }

    #[test]
    fn test_advice_requires_analysis() {
        let mut session = Session::new();
        assert!(matches!(
            session.record_advice("raw".into(), "summary".into()),
            Err(NutritionError::NoAnalysis)
        ));
    }

    #[test]
    fn test_take_image_consumes_it() {
        let mut session = Session::new();
        assert!(matches!(session.take_image(), Err(NutritionError::NoImage)));
        session.attach_image(image());
        assert!(session.take_image().is_ok());
        assert!(session.image().is_none());
    }

    #[test]
    fn test_restored_image_keeps_newer_upload() {
        let mut session = Session::new();
        session.attach_image(image());
        let taken = session.take_image().unwrap();
        session.restore_image(taken);
        assert!(session.image().is_some());

        let stale = session.take_image().unwrap();
        let newer = MealImage::decode(&jpeg_bytes()).unwrap();
        session.attach_image(newer);
        session.restore_image(stale);
        assert_eq!(session.image().map(MealImage::mime_type), Some("image/jpeg"));
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = Session::new();
        let b = Session::new();
        a.profile.name = Some("Asha".into());
        assert_ne!(a.id(), b.id());
        assert!(b.profile.name.is_none());
    }
}
