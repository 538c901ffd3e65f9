//! Orchestrator: runs every stage in order over one request, threading the
//! typed outputs and stopping at the first fatal error.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{ComponentCatalog, PipelineRequest, SystemConfiguration};
use crate::error::{Degradation, PipelineError};
use crate::irradiance::{
    IrradianceEstimate, IrradianceProvider, IrradianceService, IrradianceSource,
};
use crate::matcher::{ComponentMatcher, MatchingResult};
use crate::optimizer::{CostOptimizer, OptimizationResult};
use crate::report::{ReportCompiler, SystemReport};
use crate::simulation::{PerformanceSimulator, SimulationOutcome};
use crate::sizing::{
    BatterySizer, BatterySizing, LoadAnalysis, LoadModel, PanelSizer, PanelSizing,
};

/// Everything one successful run produced, one field per stage.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowState {
    pub run_id: Uuid,
    pub load_analysis: LoadAnalysis,
    pub irradiance: IrradianceEstimate,
    pub panel_sizing: PanelSizing,
    pub battery_sizing: BatterySizing,
    pub component_matching: MatchingResult,
    pub optimization: OptimizationResult,
    pub selected_configuration: Option<SystemConfiguration>,
    /// Skipped when no configuration could be selected
    pub simulation: Option<SimulationOutcome>,
    pub report: SystemReport,
    pub degradations: Vec<Degradation>,
}

/// Terminal response. Errors carry no partial stage data.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PipelineResponse {
    Success(Box<WorkflowState>),
    Error { error_type: String, error: String },
}

impl PipelineResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResponse::Success(_))
    }
}

impl From<Result<WorkflowState, PipelineError>> for PipelineResponse {
    fn from(result: Result<WorkflowState, PipelineError>) -> Self {
        match result {
            Ok(state) => PipelineResponse::Success(Box::new(state)),
            Err(err) => PipelineResponse::Error {
                error_type: err.error_type().to_string(),
                error: err.to_string(),
            },
        }
    }
}

pub struct Pipeline {
    catalog: ComponentCatalog,
    irradiance: Arc<dyn IrradianceProvider>,
    panel_sizer: PanelSizer,
    battery_sizer: BatterySizer,
    matcher: ComponentMatcher,
    optimizer: CostOptimizer,
    simulator: PerformanceSimulator,
    reporter: ReportCompiler,
}

impl Pipeline {
    pub fn new(
        config: &Config,
        catalog: ComponentCatalog,
        irradiance: Arc<dyn IrradianceProvider>,
    ) -> Self {
        Self {
            catalog,
            irradiance,
            panel_sizer: PanelSizer::from(&config.sizing),
            battery_sizer: BatterySizer::from(&config.sizing),
            matcher: ComponentMatcher::new(config.search.clone()),
            optimizer: CostOptimizer::from(&config.tariff),
            simulator: PerformanceSimulator::from(&config.simulation),
            reporter: ReportCompiler::from(&config.tariff),
        }
    }

    /// Load the catalog named in `config` and use the default irradiance
    /// chain.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let catalog = ComponentCatalog::from_toml_file(&config.catalog.path)?;
        let irradiance = Arc::new(IrradianceService::new(&config.irradiance));
        Ok(Self::new(config, catalog, irradiance))
    }

    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    pub async fn run(&self, request: &PipelineRequest) -> PipelineResponse {
        let result = self.execute(request).await;
        if let Err(err) = &result {
            error!(error_type = err.error_type(), error = %err, "pipeline run failed");
        }
        result.into()
    }

    /// Parse a JSON request body and run it. Malformed JSON is a validation
    /// error.
    pub async fn run_json(&self, body: &str) -> PipelineResponse {
        match serde_json::from_str::<PipelineRequest>(body) {
            Ok(request) => self.run(&request).await,
            Err(err) => {
                let err = PipelineError::Validation(format!("malformed request: {}", err));
                error!(error = %err, "rejecting request");
                Err(err).into()
            }
        }
    }

    pub async fn execute(&self, request: &PipelineRequest) -> Result<WorkflowState, PipelineError> {
        let request = request.validated()?;
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", %run_id, location = %request.location);
        self.execute_stages(run_id, request).instrument(span).await
    }

    async fn execute_stages(
        &self,
        run_id: Uuid,
        request: &PipelineRequest,
    ) -> Result<WorkflowState, PipelineError> {
        let mut degradations = Vec::new();
        let mut degrade = |degradation: Degradation| {
            warn!(%degradation, "continuing with fallback");
            degradations.push(degradation);
        };

        let load_analysis = LoadModel::analyze(&request.appliances, request.backup_hours);
        let daily_kwh = load_analysis.profile.daily_consumption_kwh;
        let peak_watts = load_analysis.profile.peak_load_watts;
        info!(
            daily_kwh,
            peak_watts,
            appliances = load_analysis.profile.total_appliances,
            "load analysed"
        );

        let site = request.site();
        let irradiance = self.irradiance.estimate(&site).await;
        if site.coordinates().is_some() && irradiance.source != IrradianceSource::NasaPower {
            degrade(Degradation::IrradianceFallback {
                source: irradiance.source,
            });
        }
        info!(
            source = %irradiance.source,
            peak_sun_hours = irradiance.peak_sun_hours,
            "irradiance resolved"
        );

        let panel_sizing = self.panel_sizer.size(daily_kwh, &irradiance, &self.catalog)?;
        let battery_sizing = self.battery_sizer.size(
            daily_kwh,
            request.backup_hours,
            request.system_voltage,
            &self.catalog,
        )?;
        info!(
            required_watts = panel_sizing.required_capacity_watts,
            required_ah = battery_sizing.required_capacity_ah,
            panels = panel_sizing.candidates.len(),
            batteries = battery_sizing.candidates.len(),
            "components sized"
        );

        let component_matching = self.matcher.match_components(
            &panel_sizing.candidates,
            &battery_sizing.candidates,
            peak_watts,
            &self.catalog,
        )?;

        let optimization =
            self.optimizer
                .optimize(&component_matching.configurations, request.budget, request.priority);
        if let Some(degradation) = optimization.degradation() {
            degrade(degradation);
        }

        let selected_configuration = optimization.selected().cloned();
        let simulation = match &selected_configuration {
            Some(selected) => Some(self.simulator.simulate(selected, daily_kwh, &irradiance)?),
            None => {
                degrade(Degradation::NoConfigurations);
                None
            }
        };

        let report = self.reporter.compile(
            request,
            &load_analysis,
            &optimization,
            simulation.as_ref(),
            &degradations,
        );
        info!(
            selected = selected_configuration.as_ref().map(|c| c.config_id.as_str()),
            degradations = degradations.len(),
            "pipeline run complete"
        );

        Ok(WorkflowState {
            run_id,
            load_analysis,
            irradiance,
            panel_sizing,
            battery_sizing,
            component_matching,
            optimization,
            selected_configuration,
            simulation,
            report,
            degradations,
        })
    }
}
