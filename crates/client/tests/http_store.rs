//! Round-trip tests for the HTTP store client against a mock server.

use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::json;

use shiftgrid_client::{CellWrite, RowPatch, SchedulePatch, ScheduleStore, StoreClient, StoreError};
use shiftgrid_engine::ids::{PositionId, RowId, ScheduleId};
use shiftgrid_engine::schedule::SalaryHandling;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
}

fn client(server: &MockServer) -> StoreClient {
    StoreClient::new(server.url(""), None).unwrap()
}

#[test]
fn test_batch_update_cells_round_trip() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/schedules/1/cells/batch")
            .json_body(json!({
                "items": [
                    { "rowId": 5, "workDate": "2026-07-01", "valueRaw": "8" },
                    { "rowId": 5, "workDate": "2026-07-02", "valueRaw": null },
                ]
            }));
        then.status(200).json_body(json!([
            { "rowId": 5, "workDate": "2026-07-01", "valueRaw": "8", "value": 8.0 }
        ]));
    });

    let items = vec![
        CellWrite {
            row_id: RowId::from_raw(5),
            work_date: date(1),
            value_raw: Some("8".into()),
        },
        CellWrite {
            row_id: RowId::from_raw(5),
            work_date: date(2),
            value_raw: None,
        },
    ];

    let cells = client(&server)
        .batch_update_cells(ScheduleId::from_raw(1), &items)
        .unwrap();

    mock.assert();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].value, Some(8.0));
    assert_eq!(cells[0].value_raw, "8");
}

#[test]
fn test_get_schedule() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/schedules/7");
        then.status(200).json_body(json!({
            "id": 7,
            "title": "July staffing",
            "dateFrom": "2026-07-01",
            "dateTo": "2026-07-31",
            "rows": [{
                "id": 1,
                "positionId": 3,
                "positionName": "Barista",
                "index": 1,
                "payKind": "SHIFT",
                "payRate": 2500.0
            }],
            "cells": [],
            "plannedRevenue": null
        }));
    });

    let schedule = client(&server).get_schedule(ScheduleId::from_raw(7)).unwrap();
    assert_eq!(schedule.title, "July staffing");
    assert_eq!(schedule.day_count(), 31);
    assert_eq!(schedule.rows[0].label(), "Barista 1");
}

#[test]
fn test_create_and_update_row() {
    let server = MockServer::start();
    let created = server.mock(|when, then| {
        when.method(POST)
            .path("/schedules/7/rows")
            .json_body(json!({ "positionId": 3 }));
        then.status(200).json_body(json!({
            "id": 9, "positionId": 3, "positionName": "Barista", "index": 2,
            "payKind": "HOURLY", "payRate": 300.0
        }));
    });
    let patched = server.mock(|when, then| {
        when.method(PATCH)
            .path("/schedules/7/rows/9")
            .json_body(json!({ "salaryHandling": "FIXED", "amountOverride": 45000.0 }));
        then.status(200).json_body(json!({
            "id": 9, "positionId": 3, "positionName": "Barista", "index": 2,
            "payKind": "HOURLY", "payRate": 300.0,
            "amountOverride": 45000.0, "salaryHandling": "FIXED"
        }));
    });

    let c = client(&server);
    let row = c
        .create_row(ScheduleId::from_raw(7), PositionId::from_raw(3))
        .unwrap();
    created.assert();
    assert_eq!(row.index, 2);

    let patch = RowPatch {
        salary_handling: Some(SalaryHandling::Fixed),
        amount_override: Some(Some(45_000.0)),
        ..RowPatch::default()
    };
    let row = c
        .update_row(ScheduleId::from_raw(7), RowId::from_raw(9), &patch)
        .unwrap();
    patched.assert();
    assert_eq!(row.amount_override, Some(45_000.0));
}

#[test]
fn test_delete_row() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/schedules/7/rows/9");
        then.status(204);
    });

    client(&server)
        .delete_row(ScheduleId::from_raw(7), RowId::from_raw(9))
        .unwrap();
    mock.assert();
}

#[test]
fn test_update_schedule_planned_revenue() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PATCH)
            .path("/schedules/7")
            .json_body(json!({ "plannedRevenue": 120000.0 }));
        then.status(200).json_body(json!({
            "id": 7, "title": "July", "dateFrom": "2026-07-01", "dateTo": "2026-07-31",
            "rows": [], "cells": [], "plannedRevenue": 120000.0
        }));
    });

    let patch = SchedulePatch {
        planned_revenue: Some(Some(120_000.0)),
    };
    let schedule = client(&server)
        .update_schedule(ScheduleId::from_raw(7), &patch)
        .unwrap();
    assert_eq!(schedule.planned_revenue, Some(120_000.0));
}

#[test]
fn test_validation_error_surfaces_server_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/schedules/1/cells/batch");
        then.status(400)
            .json_body(json!({ "message": "workDate outside schedule range" }));
    });

    let err = client(&server)
        .batch_update_cells(ScheduleId::from_raw(1), &[])
        .unwrap_err();
    match err {
        StoreError::Validation(msg) => assert_eq!(msg, "workDate outside schedule range"),
        other => panic!("expected Validation, got {:?}", other),
    }
}

#[test]
fn test_server_error_maps_to_http() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/schedules/1");
        then.status(500).body("boom");
    });

    let err = client(&server).get_schedule(ScheduleId::from_raw(1)).unwrap_err();
    match err {
        StoreError::Http(500, body) => assert_eq!(body, "boom"),
        other => panic!("expected Http(500), got {:?}", other),
    }
}
