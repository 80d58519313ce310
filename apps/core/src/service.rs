use crate::cache::RewriteCache;
use crate::error::AppError;
use crate::llm::ChatCompletion;
use crate::models::{RewriteRequest, RewriteResponse, SmoothRequest, SmoothResponse};
use crate::rewrite::{
    fallback_rewrites, fallback_smooth, labels, parse_rewrites, parse_smoothed, select_mode,
    PromptBuilder, Rewrite, RewriteMode,
};
use crate::risk::{
    AnalysisInput, Platform, PolitenessAnalyzer, RiskAnalyzer, RiskAssessment, RiskContext, Tone,
};
use crate::usage::{Plan, UsageLedger, UsageStatus};
use chrono::Utc;
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Entry point for rewrite, smooth and assessment requests.
///
/// Orchestrates the risk engine, the completion backend, the usage ledger and
/// the rewrite cache. Safe to share behind an `Arc`: the ledger reserves
/// usage atomically before each model call.
pub struct RewriteService {
    llm: Arc<dyn ChatCompletion>,
    ledger: Arc<dyn UsageLedger>,
    cache: RewriteCache,
    analyzer: RiskAnalyzer,
    politeness: PolitenessAnalyzer,
    prompts: PromptBuilder,
    /// Upper bound for one completion, retries included.
    llm_deadline: Duration,
}

impl RewriteService {
    pub fn new(
        llm: Arc<dyn ChatCompletion>,
        ledger: Arc<dyn UsageLedger>,
        llm_deadline: Duration,
    ) -> Self {
        Self {
            llm,
            ledger,
            cache: RewriteCache::default(),
            analyzer: RiskAnalyzer::new(),
            politeness: PolitenessAnalyzer::new(),
            prompts: PromptBuilder::new(),
            llm_deadline,
        }
    }

    /// Runs the risk engine only. Never fails and never charges usage.
    pub fn assess(&self, input: &AnalysisInput) -> RiskAssessment {
        self.analyzer.assess_input(input)
    }

    pub async fn usage(&self, user_id: &str) -> Result<UsageStatus, AppError> {
        self.ledger.check_usage(user_id).await
    }

    pub async fn set_plan(&self, user_id: &str, plan: Plan) -> Result<UsageStatus, AppError> {
        self.ledger.set_plan(user_id, plan).await
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn rewrite(&self, request: RewriteRequest) -> Result<RewriteResponse, AppError> {
        request.validate()?;
        require_content(&request.text, &request.user_id)?;

        let platform = resolve_platform(request.platform.as_deref(), request.url.as_deref());
        let context = RiskContext {
            url: request.url.clone(),
        };
        let assessment = self.analyzer.assess(&request.text, platform, &context);
        let mode = select_mode(&assessment, request.mode, request.panic);
        info!("{} -> mode {}", assessment.summary(), mode);

        if let Some(hit) = self.cache.get(&request.text, platform, mode) {
            let usage = self.ledger.check_usage(&request.user_id).await?;
            return Ok(build_rewrite_response(
                hit.rewrites,
                mode,
                assessment,
                false,
                true,
                Some(hit.id),
                usage,
            ));
        }

        let usage = self.charge(&request.user_id).await?;

        let prompt = self.prompts.rewrite_prompt(&request.text, &assessment, mode);
        let (rewrites, fallback) = match self.complete(&prompt.system, &prompt.user).await {
            Ok(raw) => match parse_rewrites(&raw) {
                Ok(rewrites) => (rewrites, false),
                Err(e) => {
                    warn!("Unusable completion, using fallback rewrites: {}", e);
                    (fallback_rewrites(&request.text, mode), true)
                }
            },
            Err(e) if e.is_recoverable_upstream() => {
                warn!("Completion failed, using fallback rewrites: {}", e);
                (fallback_rewrites(&request.text, mode), true)
            }
            Err(e) => return Err(self.refund(&request.user_id, e).await),
        };

        let cache_id = (!fallback).then(|| {
            self.cache.prune_expired(Utc::now());
            self.cache.insert(&request.text, platform, mode, rewrites.clone())
        });

        Ok(build_rewrite_response(
            rewrites, mode, assessment, fallback, false, cache_id, usage,
        ))
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn smooth(&self, request: SmoothRequest) -> Result<SmoothResponse, AppError> {
        request.validate()?;
        require_content(&request.text, &request.user_id)?;

        let usage = self.charge(&request.user_id).await?;

        let tone = Tone::from_slider(request.tone_value);
        let politeness = self.politeness.analyze(&request.text);
        let prompt = self.prompts.smooth_prompt(&request.text, tone);

        let (smoothed_text, fallback) = match self.complete(&prompt.system, &prompt.user).await {
            Ok(raw) => {
                let text = parse_smoothed(&raw);
                if text.trim().is_empty() {
                    (fallback_smooth(&request.text, tone), true)
                } else {
                    (text, false)
                }
            }
            Err(e) if e.is_recoverable_upstream() => {
                warn!("Completion failed, using fallback smoothing: {}", e);
                (fallback_smooth(&request.text, tone), true)
            }
            Err(e) => return Err(self.refund(&request.user_id, e).await),
        };

        Ok(SmoothResponse {
            smoothed_text,
            original_text: request.text,
            tone,
            tone_value: request.tone_value,
            politeness,
            fallback,
            usage,
        })
    }

    /// Reserves one unit of the user's allowance before any model call.
    async fn charge(&self, user_id: &str) -> Result<UsageStatus, AppError> {
        self.ledger.try_charge(user_id).await.map_err(|e| {
            if let AppError::QuotaExceeded { limit } = &e {
                warn!("User {} is out of rewrites (limit {})", user_id, limit);
            }
            e
        })
    }

    /// Returns the reservation taken by `charge` and hands back `cause`.
    async fn refund(&self, user_id: &str, cause: AppError) -> AppError {
        if let Err(e) = self.ledger.refund_usage(user_id).await {
            error!("Failed to refund usage for {}: {}", user_id, e);
        }
        cause
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, AppError> {
        timeout(self.llm_deadline, self.llm.complete(system, user, None)).await?
    }
}

fn require_content(text: &str, user_id: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }
    if user_id.trim().is_empty() {
        return Err(AppError::Validation("User ID is required".to_string()));
    }
    Ok(())
}

/// Explicit platform name wins; otherwise the page URL decides.
fn resolve_platform(name: Option<&str>, url: Option<&str>) -> Platform {
    match (name, url) {
        (Some(name), _) if !name.trim().is_empty() => Platform::parse(name),
        (_, Some(url)) => Platform::from_url(url),
        _ => Platform::General,
    }
}

fn build_rewrite_response(
    rewrites: Vec<Rewrite>,
    mode: RewriteMode,
    assessment: RiskAssessment,
    fallback: bool,
    from_cache: bool,
    cache_id: Option<Uuid>,
    usage: UsageStatus,
) -> RewriteResponse {
    RewriteResponse {
        rewrites,
        mode,
        slot_labels: labels::slot_labels(mode).iter().map(|l| l.to_string()).collect(),
        risk_badge: labels::risk_badge(assessment.overall_risk).to_string(),
        context_badges: labels::context_badges(&assessment),
        recommendations: assessment
            .recommendations
            .iter()
            .map(|r| labels::recommendation_text(*r).to_string())
            .collect(),
        offers_panic_mode: assessment.offers_panic_mode(),
        assessment,
        fallback,
        from_cache,
        cache_id,
        usage,
    }
}
