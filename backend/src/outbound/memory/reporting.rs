//! Platform report, commission rules, and dashboard counters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{ReportingRepository, ReportingRepositoryError};
use crate::domain::{
    CommissionRule, DisputeStatus, DriverStats, FleetOwnerStats, LoadStatus, Payment,
    PaymentStatus, PlatformReport, ShipperStats, TripStatus, TruckStatus,
};

use super::{MemoryStore, count, newest_first};

fn total<'a>(payments: impl Iterator<Item = &'a Payment>) -> f64 {
    payments.map(|payment| payment.amount).sum()
}

#[async_trait]
impl ReportingRepository for MemoryStore {
    async fn platform_report(&self) -> Result<PlatformReport, ReportingRepositoryError> {
        let state = self.state.lock().await;
        let loads_in =
            |status: LoadStatus| count(state.loads.iter().filter(|load| load.status == status));
        Ok(PlatformReport {
            total_users: count(state.users.iter()),
            total_trucks: count(state.trucks.iter()),
            open_loads: loads_in(LoadStatus::Open),
            completed_loads: loads_in(LoadStatus::Delivered),
            open_disputes: count(
                state
                    .disputes
                    .iter()
                    .filter(|dispute| dispute.status == DisputeStatus::Open),
            ),
            total_revenue: total(
                state
                    .payments
                    .iter()
                    .filter(|payment| payment.status == PaymentStatus::Paid),
            ),
        })
    }

    async fn active_commission(&self) -> Result<Option<CommissionRule>, ReportingRepositoryError> {
        let state = self.state.lock().await;
        Ok(newest_first(state.commission_rules.iter().filter(|rule| rule.active))
            .into_iter()
            .next())
    }

    async fn replace_commission(
        &self,
        rule: &CommissionRule,
    ) -> Result<(), ReportingRepositoryError> {
        let mut state = self.state.lock().await;
        for existing in &mut state.commission_rules {
            existing.active = false;
        }
        state.commission_rules.push(rule.clone());
        Ok(())
    }

    async fn verify_document(&self, id: &Uuid) -> Result<bool, ReportingRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(document) = state.documents.iter_mut().find(|doc| doc.id == *id) else {
            return Ok(false);
        };
        document.verified = true;
        Ok(true)
    }

    async fn driver_stats(&self, user_id: &Uuid) -> Result<DriverStats, ReportingRepositoryError> {
        let state = self.state.lock().await;
        let driven = || state.trips.iter().filter(|trip| trip.driver_id == *user_id);
        Ok(DriverStats {
            active_trips: count(driven().filter(|trip| trip.status != TripStatus::Delivered)),
            completed_trips: count(driven().filter(|trip| trip.status == TripStatus::Delivered)),
            total_earnings: total(state.payments.iter().filter(|payment| {
                payment.payee_id == *user_id && payment.status == PaymentStatus::Paid
            })),
        })
    }

    async fn fleet_owner_stats(
        &self,
        user_id: &Uuid,
    ) -> Result<FleetOwnerStats, ReportingRepositoryError> {
        let state = self.state.lock().await;
        let drivers: Vec<Uuid> = state
            .fleet_of(*user_id)
            .filter_map(|truck| truck.assigned_driver_id)
            .collect();
        Ok(FleetOwnerStats {
            total_trucks: count(state.fleet_of(*user_id)),
            available_trucks: count(
                state
                    .fleet_of(*user_id)
                    .filter(|truck| truck.status == TruckStatus::Available),
            ),
            active_jobs: count(state.loads.iter().filter(|load| {
                load.status == LoadStatus::InProgress
                    && load
                        .assigned_driver_id
                        .is_some_and(|driver| drivers.contains(&driver))
            })),
        })
    }

    async fn shipper_stats(
        &self,
        user_id: &Uuid,
    ) -> Result<ShipperStats, ReportingRepositoryError> {
        let state = self.state.lock().await;
        let own_loads: Vec<Uuid> = state
            .loads
            .iter()
            .filter(|load| load.shipper_id == *user_id)
            .map(|load| load.id)
            .collect();
        Ok(ShipperStats {
            total_loads: count(own_loads.iter()),
            open_loads: count(state.loads.iter().filter(|load| {
                load.shipper_id == *user_id && load.status == LoadStatus::Open
            })),
            pending_payments: total(state.payments.iter().filter(|payment| {
                payment.status == PaymentStatus::Pending && own_loads.contains(&payment.load_id)
            })),
        })
    }
}
