//! Temperature monitoring: classify readings against location thresholds.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::instrument;

use crate::db::DbPool;
use crate::entities::storage_location;
use crate::entities::temperature_log::{self, TemperatureStatus};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

#[derive(Debug, Clone)]
pub struct NewTemperatureLog {
    pub location_id: i64,
    pub reading: Decimal,
    /// Explicit thresholds override the location's configured range.
    pub min_threshold: Option<Decimal>,
    pub max_threshold: Option<Decimal>,
    pub recorded_by: String,
}

/// Classifies a reading. Outside [min, max] is OUT_OF_RANGE; within 5% of
/// the range width from either threshold is WARNING; otherwise NORMAL.
pub fn classify(reading: Decimal, min: Decimal, max: Decimal) -> TemperatureStatus {
    if reading < min || reading > max {
        return TemperatureStatus::OutOfRange;
    }
    let band = (max - min) * dec!(0.05);
    if reading - min <= band || max - reading <= band {
        return TemperatureStatus::Warning;
    }
    TemperatureStatus::Normal
}

#[derive(Clone)]
pub struct TemperatureService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl TemperatureService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Records a reading, classified at write time. Thresholds come from the
    /// request or fall back to the location's configured range.
    #[instrument(skip(self, new))]
    pub async fn record(
        &self,
        new: NewTemperatureLog,
    ) -> Result<temperature_log::Model, ServiceError> {
        let (min, max) = match (new.min_threshold, new.max_threshold) {
            (Some(min), Some(max)) => (min, max),
            _ => {
                let location = storage_location::Entity::find_by_id(new.location_id)
                    .one(&*self.db)
                    .await
                    .map_err(ServiceError::db_error)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("storage location {}", new.location_id))
                    })?;
                match (
                    new.min_threshold.or(location.min_temperature),
                    new.max_threshold.or(location.max_temperature),
                ) {
                    (Some(min), Some(max)) => (min, max),
                    _ => {
                        return Err(ServiceError::MissingData(format!(
                            "storage location {} has no temperature thresholds",
                            new.location_id
                        )))
                    }
                }
            }
        };
        if min > max {
            return Err(ServiceError::ValidationError(format!(
                "min threshold {} exceeds max threshold {}",
                min, max
            )));
        }

        let status = classify(new.reading, min, max);
        let log = temperature_log::ActiveModel {
            location_id: Set(new.location_id),
            reading: Set(new.reading),
            min_threshold: Set(min),
            max_threshold: Set(max),
            status: Set(status.as_str().to_string()),
            recorded_by: Set(new.recorded_by),
            recorded_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)?;

        if status == TemperatureStatus::OutOfRange {
            self.event_sender
                .send(Event::TemperatureOutOfRange {
                    log_id: log.id,
                    location_id: log.location_id,
                    reading: log.reading,
                    recorded_at: log.recorded_at,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        Ok(log)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        location_id: Option<i64>,
        status: Option<TemperatureStatus>,
    ) -> Result<Vec<temperature_log::Model>, ServiceError> {
        let mut query = temperature_log::Entity::find();
        if let Some(location_id) = location_id {
            query = query.filter(temperature_log::Column::LocationId.eq(location_id));
        }
        if let Some(status) = status {
            query = query.filter(temperature_log::Column::Status.eq(status.as_str()));
        }
        query
            .order_by_desc(temperature_log::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // band for [2, 8] = (8 - 2) * 0.05 = 0.3
    #[rstest]
    #[case(dec!(5), TemperatureStatus::Normal)]
    #[case(dec!(2.2), TemperatureStatus::Warning)]
    #[case(dec!(7.8), TemperatureStatus::Warning)]
    #[case(dec!(2), TemperatureStatus::Warning)]
    #[case(dec!(8), TemperatureStatus::Warning)]
    #[case(dec!(1.9), TemperatureStatus::OutOfRange)]
    #[case(dec!(8.1), TemperatureStatus::OutOfRange)]
    fn classifies_readings_against_a_cold_range(
        #[case] reading: Decimal,
        #[case] expected: TemperatureStatus,
    ) {
        assert_eq!(classify(reading, dec!(2), dec!(8)), expected);
    }

    #[test]
    fn degenerate_range_has_no_warning_band() {
        assert_eq!(classify(dec!(4), dec!(4), dec!(4)), TemperatureStatus::Warning);
        assert_eq!(classify(dec!(5), dec!(4), dec!(4)), TemperatureStatus::OutOfRange);
    }
}
