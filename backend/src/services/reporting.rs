//! Reporting service for the dashboard and harvest reconciliation
//! Both reports run every plot through the shared metrics calculator

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    inspect_plot, summarize_portfolio, DateRange, HarvestEvent, HarvestGrade, MetricsCalculator,
    Plot, PortfolioSummary,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::{HarvestLogService, PlotService};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    plots: PlotService,
    harvests: HarvestLogService,
    calculator: MetricsCalculator,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub as_of: NaiveDate,
    #[serde(flatten)]
    pub summary: PortfolioSummary,
    pub plots_with_data_issues: usize,
}

/// One row of the harvest report: stored totals against the event log.
/// JSON and CSV share the camelCase field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestReconciliation {
    pub plot_id: Uuid,
    pub plot_name: String,
    pub current_cycle: u32,
    pub completed_cycles: u32,
    pub days_since_planting: i64,
    pub recorded_cycle_kg: Decimal,
    pub logged_cycle_kg: Decimal,
    pub cycle_discrepancy_kg: Decimal,
    pub recorded_total_kg: Decimal,
    pub logged_total_kg: Decimal,
    pub total_discrepancy_kg: Decimal,
    pub grade_a_kg: Decimal,
    pub grade_b_kg: Decimal,
    pub grade_c_kg: Decimal,
    pub reject_kg: Decimal,
    pub event_count: usize,
}

impl HarvestReconciliation {
    pub fn is_balanced(&self) -> bool {
        self.cycle_discrepancy_kg.is_zero() && self.total_discrepancy_kg.is_zero()
    }
}

impl ReportingService {
    pub fn new(db: PgPool, calculator: MetricsCalculator) -> Self {
        Self {
            plots: PlotService::new(db.clone(), calculator),
            harvests: HarvestLogService::new(db),
            calculator,
        }
    }

    /// Get dashboard metrics
    #[tracing::instrument(skip(self))]
    pub async fn get_dashboard_metrics(
        &self,
        business_id: Uuid,
        reference: NaiveDate,
    ) -> AppResult<DashboardMetrics> {
        let plots = self.plots.get_plots(business_id).await?;
        Ok(Self::build_dashboard(&self.calculator, &plots, reference))
    }

    /// Get harvest reconciliation report by plot
    #[tracing::instrument(skip(self))]
    pub async fn get_harvest_report(
        &self,
        business_id: Uuid,
        reference: NaiveDate,
        range: DateRange,
    ) -> AppResult<Vec<HarvestReconciliation>> {
        let plots = self.plots.get_plots(business_id).await?;
        let events = self.harvests.get_events(business_id, range).await?;

        let report = Self::reconcile_harvests(&self.calculator, &plots, &events, reference, range);
        let unbalanced = report.iter().filter(|row| !row.is_balanced()).count();
        if unbalanced > 0 {
            tracing::warn!(unbalanced, "Harvest totals disagree with the event log");
        }
        Ok(report)
    }

    /// Fold plots into dashboard metrics. A plot with bad data still counts.
    pub fn build_dashboard(
        calculator: &MetricsCalculator,
        plots: &[Plot],
        reference: NaiveDate,
    ) -> DashboardMetrics {
        let plots_with_data_issues = plots
            .iter()
            .filter(|plot| {
                let issues = inspect_plot(plot);
                for issue in &issues {
                    tracing::warn!(plot_id = %plot.id, "Plot data issue: {}", issue);
                }
                !issues.is_empty()
            })
            .count();

        DashboardMetrics {
            as_of: reference,
            summary: summarize_portfolio(calculator, plots, reference),
            plots_with_data_issues,
        }
    }

    /// Reconcile each plot's stored harvest figures against logged events.
    ///
    /// Events outside `range` or for unknown plots are ignored.
    pub fn reconcile_harvests(
        calculator: &MetricsCalculator,
        plots: &[Plot],
        events: &[HarvestEvent],
        reference: NaiveDate,
        range: DateRange,
    ) -> Vec<HarvestReconciliation> {
        let mut by_plot: HashMap<Uuid, Vec<&HarvestEvent>> = HashMap::new();
        for event in events.iter().filter(|e| range.contains(e.harvest_date)) {
            by_plot.entry(event.plot_id).or_default().push(event);
        }

        plots
            .iter()
            .map(|plot| {
                let metrics = calculator.compute(plot, reference);
                let logged = by_plot.get(&plot.id).map(Vec::as_slice).unwrap_or_default();

                let mut by_grade: HashMap<HarvestGrade, Decimal> = HashMap::new();
                let mut logged_cycle_kg = Decimal::ZERO;
                let mut logged_total_kg = Decimal::ZERO;
                for event in logged {
                    let graded = by_grade.entry(event.grade).or_default();
                    *graded = graded.saturating_add(event.quantity_kg);
                    logged_total_kg = logged_total_kg.saturating_add(event.quantity_kg);
                    if event.cycle == plot.current_cycle {
                        logged_cycle_kg = logged_cycle_kg.saturating_add(event.quantity_kg);
                    }
                }
                let grade_kg = |grade: HarvestGrade| by_grade.get(&grade).copied().unwrap_or_default();

                HarvestReconciliation {
                    plot_id: plot.id,
                    plot_name: plot.name.clone(),
                    current_cycle: plot.current_cycle,
                    completed_cycles: metrics.completed_cycles,
                    days_since_planting: metrics.days_since_planting,
                    recorded_cycle_kg: metrics.current_cycle_harvest_kg,
                    logged_cycle_kg,
                    cycle_discrepancy_kg: metrics
                        .current_cycle_harvest_kg
                        .saturating_sub(logged_cycle_kg),
                    recorded_total_kg: metrics.total_harvest_kg,
                    logged_total_kg,
                    total_discrepancy_kg: metrics.total_harvest_kg.saturating_sub(logged_total_kg),
                    grade_a_kg: grade_kg(HarvestGrade::GradeA),
                    grade_b_kg: grade_kg(HarvestGrade::GradeB),
                    grade_c_kg: grade_kg(HarvestGrade::GradeC),
                    reject_kg: grade_kg(HarvestGrade::Reject),
                    event_count: logged.len(),
                }
            })
            .collect()
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            crate::error::AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
