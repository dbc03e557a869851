use crate::{
    data::snapshot::SnapshotRepository,
    error::AppError,
    model::{
        metric::MetricId,
        snapshot::EntitySnapshot,
        tracked::EntityRef,
    },
};
use chrono::{Duration, Utc};
use sea_orm::{EntityTrait, PaginatorTrait};
use std::collections::BTreeMap;
use test_utils::{
    builder::TestBuilder,
    factory::{create_metric_snapshot, metric_snapshot::MetricSnapshotFactory},
};

mod entities;
mod leaders;
