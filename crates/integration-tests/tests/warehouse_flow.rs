//! End-to-end tests: server router against the mock inventory backend.

#![allow(clippy::unwrap_used)]

use serde_json::{Value, json};

use stockyard_core::{BinId, BinItemId, CountStatus};
use stockyard_integration_tests::TestContext;

async fn get_json(ctx: &TestContext, path: &str) -> (reqwest::StatusCode, Value) {
    let response = ctx.client.get(ctx.url(path)).send().await.unwrap();
    let status = response.status();
    let body = response.json().await.unwrap();
    (status, body)
}

async fn post_json(ctx: &TestContext, path: &str, body: Value) -> (reqwest::StatusCode, Value) {
    let response = ctx
        .client
        .post(ctx.url(path))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    let body = response.json().await.unwrap();
    (status, body)
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::spawn_demo().await;

    let response = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");

    let response = ctx
        .client
        .get(ctx.url("/health/ready"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

// =============================================================================
// Zones & zone map
// =============================================================================

#[tokio::test]
async fn test_zone_list_reports_configuration() {
    let ctx = TestContext::spawn_demo().await;

    let (status, body) = get_json(&ctx, "/zones").await;
    assert_eq!(status, 200);

    let zones = body["zones"].as_array().unwrap();
    assert_eq!(zones.len(), 3);
    assert_eq!(zones[0]["code"], "PICK-A");
    assert_eq!(zones[0]["configured"], true);
    assert_eq!(zones[1]["code"], "RCV");
    assert_eq!(zones[1]["configured"], false);
}

#[tokio::test]
async fn test_zone_map_uniform_derivation() {
    let ctx = TestContext::spawn_demo().await;

    let (status, body) = get_json(&ctx, "/zones/1/map").await;
    assert_eq!(status, 200);
    assert_eq!(body["configured"], true);
    assert_eq!(body["source"]["kind"], "UNIFORM");

    // 2 aisles x 2 shelves x 3 slots
    let aisles = body["aisles"].as_array().unwrap();
    assert_eq!(aisles.len(), 2);
    for aisle in aisles {
        let shelves = aisle["shelves"].as_array().unwrap();
        assert_eq!(shelves.len(), 2);
        for shelf in shelves {
            assert_eq!(shelf["slots"].as_array().unwrap().len(), 3);
        }
    }

    // Bin 2 sits at aisle 1, shelf 1, position 2 with 5/10 occupancy.
    let slot = &aisles[0]["shelves"][0]["slots"][1];
    assert_eq!(slot["id"], 2);
    assert_eq!(slot["fillPercent"], 50);
    assert_eq!(slot["fillBand"], "MEDIUM");

    // No record exists at aisle 1, shelf 1, position 3.
    assert!(aisles[0]["shelves"][0]["slots"][2].is_null());

    // Summary counts: bins 1 and 5 empty, bin 3 full, bin 4 blocked.
    assert_eq!(body["summary"]["totalBins"], 5);
    assert_eq!(body["summary"]["emptyBins"], 2);
    assert_eq!(body["summary"]["occupiedBins"], 3);
    assert_eq!(body["summary"]["fullBins"], 1);
    assert_eq!(body["summary"]["blockedBins"], 1);
}

#[tokio::test]
async fn test_zone_map_not_configured() {
    let ctx = TestContext::spawn_demo().await;

    let (status, body) = get_json(&ctx, "/zones/2/map").await;
    assert_eq!(status, 200);
    assert_eq!(body["configured"], false);
    assert!(body.get("source").is_none());
    assert!(body["aisles"].as_array().unwrap().is_empty());
    assert_eq!(body["summary"]["totalBins"], 0);
}

#[tokio::test]
async fn test_zone_map_inferred_from_bins() {
    let ctx = TestContext::spawn_demo().await;

    // Zone 3 has bins on shelves 1-2, positions {1, 2}, but no structure.
    let (status, body) = get_json(&ctx, "/zones/3/map").await;
    assert_eq!(status, 200);
    assert_eq!(body["configured"], true);
    assert_eq!(body["source"]["kind"], "INFERRED");

    let aisles = body["aisles"].as_array().unwrap();
    assert_eq!(aisles.len(), 1);
    assert_eq!(aisles[0]["aisleNumber"], 1);
    let shelves = aisles[0]["shelves"].as_array().unwrap();
    assert_eq!(shelves.len(), 2);
    assert_eq!(shelves[0]["slots"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_zone_map_filter_and_highlight() {
    let ctx = TestContext::spawn_demo().await;

    let (status, body) = get_json(&ctx, "/zones/1/map?filter=empty&q=a-01-02&highlight=3").await;
    assert_eq!(status, 200);
    assert_eq!(body["filter"], "empty");

    let aisles = body["aisles"].as_array().unwrap();
    // Bin 1 (0/10) is empty: passes the filter.
    let bin1 = &aisles[0]["shelves"][0]["slots"][0];
    assert_eq!(bin1["matchesFilter"], true);
    // Bin 2 (5/10) is occupied: filtered out, but its address matches the
    // search, so it is highlighted anyway.
    let bin2 = &aisles[0]["shelves"][0]["slots"][1];
    assert_eq!(bin2["matchesFilter"], false);
    assert_eq!(bin2["highlighted"], true);
    // Bin 3 is the deep-link target.
    let bin3 = &aisles[0]["shelves"][1]["slots"][0];
    assert_eq!(bin3["highlighted"], true);
    assert_eq!(bin3["matchesFilter"], false);
}

#[tokio::test]
async fn test_zone_map_rejects_unknown_filter() {
    let ctx = TestContext::spawn_demo().await;
    let (status, body) = get_json(&ctx, "/zones/1/map?filter=bogus").await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("invalid bin filter"));
}

#[tokio::test]
async fn test_zone_map_missing_zone_is_not_found() {
    let ctx = TestContext::spawn_demo().await;
    let (status, _) = get_json(&ctx, "/zones/99/map").await;
    assert_eq!(status, 404);
}

// =============================================================================
// Bin detail & moves
// =============================================================================

#[tokio::test]
async fn test_bin_detail_lists_items() {
    let ctx = TestContext::spawn_demo().await;

    let (status, body) = get_json(&ctx, "/zones/1/bins/2").await;
    assert_eq!(status, 200);
    assert_eq!(body["address"], "A-01-02");
    assert_eq!(body["fillPercent"], 50);
    assert_eq!(body["fillBand"], "MEDIUM");
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["sku"], "HB-M8");
    assert_eq!(items[0]["quantity"], 5);

    // Empty bins fetch an empty item list, not an error.
    let (status, body) = get_json(&ctx, "/zones/1/bins/1").await;
    assert_eq!(status, 200);
    assert!(body["items"].as_array().unwrap().is_empty());

    let (status, _) = get_json(&ctx, "/zones/1/bins/99").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_move_rejects_same_bin() {
    let ctx = TestContext::spawn_demo().await;

    let (status, body) = post_json(
        &ctx,
        "/zones/1/bins/2/moves",
        json!({ "itemId": 10, "targetAddress": "A-01-02", "quantity": 2 }),
    )
    .await;
    assert_eq!(status, 422);
    assert!(body["error"].as_str().unwrap().contains("own bin"));

    // No backend mutation happened.
    let backend = ctx.backend.lock().unwrap();
    assert_eq!(backend.items[&2][0].quantity, 5);
}

#[tokio::test]
async fn test_move_rejects_bad_quantities() {
    let ctx = TestContext::spawn_demo().await;

    for quantity in [0, -1, 6] {
        let (status, body) = post_json(
            &ctx,
            "/zones/1/bins/2/moves",
            json!({ "itemId": 10, "targetAddress": "A-01-01", "quantity": quantity }),
        )
        .await;
        assert_eq!(status, 422, "quantity {quantity} was accepted");
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("between 1 and 5")
        );
    }

    let backend = ctx.backend.lock().unwrap();
    assert_eq!(backend.items[&2][0].quantity, 5);
}

#[tokio::test]
async fn test_move_rejects_malformed_address() {
    let ctx = TestContext::spawn_demo().await;

    let (status, _) = post_json(
        &ctx,
        "/zones/1/bins/2/moves",
        json!({ "itemId": 10, "targetAddress": "not an address", "quantity": 1 }),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_partial_move_conserves_quantity() {
    let ctx = TestContext::spawn_demo().await;

    let (status, body) = post_json(
        &ctx,
        "/zones/1/bins/2/moves",
        json!({ "itemId": 10, "targetAddress": "A-01-01", "quantity": 2 }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["movedQuantity"], 2);
    assert_eq!(body["remainingQuantity"], 3);
    assert_eq!(body["targetAddress"], "A-01-01");

    let backend = ctx.backend.lock().unwrap();
    // Remainder stays at the source.
    assert_eq!(backend.items[&2][0].quantity, 3);
    // The moved quantity landed at the target as a new record.
    assert_eq!(backend.items[&1][0].quantity, 2);
    assert_eq!(backend.items[&1][0].sku, "HB-M8");
    // Occupancy follows the move; totals are conserved.
    let source = backend.bins[&1].iter().find(|b| b.id == BinId::new(2)).unwrap();
    let target = backend.bins[&1].iter().find(|b| b.id == BinId::new(1)).unwrap();
    assert_eq!(source.current_occupancy, 3);
    assert_eq!(target.current_occupancy, 2);
}

#[tokio::test]
async fn test_full_move_relocates_record() {
    let ctx = TestContext::spawn_demo().await;

    let (status, body) = post_json(
        &ctx,
        "/zones/1/bins/3/moves",
        json!({ "itemId": 11, "targetAddress": "A-01-01", "quantity": 10 }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["remainingQuantity"], 0);

    let backend = ctx.backend.lock().unwrap();
    // Source bin keeps no item record; the record itself relocated.
    assert!(backend.items[&3].is_empty());
    let relocated = backend.items[&1]
        .iter()
        .find(|i| i.id == BinItemId::new(11))
        .unwrap();
    assert_eq!(relocated.quantity, 10);
}

// =============================================================================
// Cycle counting
// =============================================================================

#[tokio::test]
async fn test_cycle_list_and_progress() {
    let ctx = TestContext::spawn_demo().await;

    let (status, body) = get_json(&ctx, "/cycles").await;
    assert_eq!(status, 200);
    let cycles = body["cycles"].as_array().unwrap();
    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles[0]["status"], "DRAFT");
    assert_eq!(cycles[0]["progressPercent"], 0);
}

#[tokio::test]
async fn test_start_cycle_initializes_pending_counts() {
    let ctx = TestContext::spawn_demo().await;

    let (status, body) = post_json(&ctx, "/cycles/1/start", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "IN_PROGRESS");

    let counts = body["counts"].as_array().unwrap();
    assert_eq!(counts.len(), 3);
    for count in counts {
        assert_eq!(count["status"], "PENDING");
        assert_eq!(count["availableActions"], json!(["COUNT"]));
    }
    // Expected quantities snapshot the system quantity per bin (5, 10, 2).
    let expected: Vec<i64> = counts
        .iter()
        .map(|c| c["expectedQuantity"].as_i64().unwrap())
        .collect();
    assert_eq!(expected, vec![5, 10, 2]);

    // Starting twice is rejected locally.
    let (status, _) = post_json(&ctx, "/cycles/1/start", json!({})).await;
    assert_eq!(status, 422);
}

#[tokio::test]
async fn test_count_submission_computes_variance() {
    let ctx = TestContext::spawn_demo().await;

    let (_, started) = post_json(&ctx, "/cycles/1/start", json!({})).await;
    let count_id = started["counts"][0]["id"].as_i64().unwrap();

    // Expected 5, counted 3 -> variance -2, status COUNTED.
    let (status, body) = post_json(
        &ctx,
        &format!("/cycles/1/counts/{count_id}"),
        json!({ "countedQuantity": 3 }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "COUNTED");
    assert_eq!(body["variance"], -2);
    assert!(body["countedAt"].is_string());
    assert_eq!(body["availableActions"], json!(["ADJUST", "VERIFY"]));

    let (_, detail) = get_json(&ctx, "/cycles/1").await;
    assert_eq!(detail["countedBins"], 1);
    assert_eq!(detail["progressPercent"], 33);
}

#[tokio::test]
async fn test_count_rejects_invalid_input_before_backend() {
    let ctx = TestContext::spawn_demo().await;

    let (_, started) = post_json(&ctx, "/cycles/1/start", json!({})).await;
    let count_id = started["counts"][0]["id"].as_i64().unwrap();

    for raw in [json!(""), json!("abc"), json!(null), json!(-2)] {
        let (status, _) = post_json(
            &ctx,
            &format!("/cycles/1/counts/{count_id}"),
            json!({ "countedQuantity": raw }),
        )
        .await;
        assert_eq!(status, 422, "accepted {raw}");
    }

    // The record never left PENDING.
    let backend = ctx.backend.lock().unwrap();
    assert_eq!(backend.counts[&1][0].status, CountStatus::Pending);
}

#[tokio::test]
async fn test_adjustment_resolves_variance() {
    let ctx = TestContext::spawn_demo().await;

    let (_, started) = post_json(&ctx, "/cycles/1/start", json!({})).await;
    let count_id = started["counts"][0]["id"].as_i64().unwrap();

    post_json(
        &ctx,
        &format!("/cycles/1/counts/{count_id}"),
        json!({ "countedQuantity": 3 }),
    )
    .await;

    let (status, body) = post_json(
        &ctx,
        &format!("/cycles/1/counts/{count_id}/adjust"),
        json!({}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ADJUSTED");
    assert!(body["adjustedAt"].is_string());
    assert_eq!(body["availableActions"], json!([]));

    let (_, detail) = get_json(&ctx, "/cycles/1").await;
    assert_eq!(detail["adjustedBins"], 1);

    // The backend committed the stock adjustment (5 - 2 = 3).
    let backend = ctx.backend.lock().unwrap();
    let bin = backend.bins[&1].iter().find(|b| b.id == BinId::new(2)).unwrap();
    assert_eq!(bin.current_occupancy, 3);
}

#[tokio::test]
async fn test_adjustment_requires_open_variance() {
    let ctx = TestContext::spawn_demo().await;

    let (_, started) = post_json(&ctx, "/cycles/1/start", json!({})).await;
    let count_id = started["counts"][0]["id"].as_i64().unwrap();

    // Pending record: nothing to adjust yet.
    let (status, _) = post_json(
        &ctx,
        &format!("/cycles/1/counts/{count_id}/adjust"),
        json!({}),
    )
    .await;
    assert_eq!(status, 422);

    // Exact count: variance 0, still nothing to adjust.
    post_json(
        &ctx,
        &format!("/cycles/1/counts/{count_id}"),
        json!({ "countedQuantity": 5 }),
    )
    .await;
    let (status, _) = post_json(
        &ctx,
        &format!("/cycles/1/counts/{count_id}/adjust"),
        json!({}),
    )
    .await;
    assert_eq!(status, 422);
}

#[tokio::test]
async fn test_verification_pass() {
    let ctx = TestContext::spawn_demo().await;

    let (_, started) = post_json(&ctx, "/cycles/1/start", json!({})).await;
    let count_id = started["counts"][0]["id"].as_i64().unwrap();

    post_json(
        &ctx,
        &format!("/cycles/1/counts/{count_id}"),
        json!({ "countedQuantity": 5 }),
    )
    .await;

    let (status, body) = post_json(
        &ctx,
        &format!("/cycles/1/counts/{count_id}/verify"),
        json!({}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "VERIFIED");
}

#[tokio::test]
async fn test_completion_warns_then_completes_with_auto_adjust() {
    let ctx = TestContext::spawn_demo().await;

    let (_, started) = post_json(&ctx, "/cycles/1/start", json!({})).await;
    let first = started["counts"][0]["id"].as_i64().unwrap();
    let second = started["counts"][1]["id"].as_i64().unwrap();

    // Count two of three bins; leave the second with an open variance.
    post_json(
        &ctx,
        &format!("/cycles/1/counts/{first}"),
        json!({ "countedQuantity": 5 }),
    )
    .await;
    post_json(
        &ctx,
        &format!("/cycles/1/counts/{second}"),
        json!({ "countedQuantity": 7 }),
    )
    .await;

    // Unacknowledged completion is rejected with the warning.
    let (status, body) = post_json(&ctx, "/cycles/1/complete", json!({})).await;
    assert_eq!(status, 400);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("1 of 3 bins have not been counted")
    );

    // Acknowledged completion with auto-adjust resolves the open variance.
    let (status, body) = post_json(
        &ctx,
        "/cycles/1/complete",
        json!({ "acknowledgeUncounted": true, "autoAdjust": true }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "COMPLETED");
    let adjusted = body["adjusted"].as_array().unwrap();
    assert_eq!(adjusted.len(), 1);
    assert_eq!(adjusted[0]["id"].as_i64().unwrap(), second);
    assert_eq!(adjusted[0]["status"], "ADJUSTED");

    let (_, detail) = get_json(&ctx, "/cycles/1").await;
    assert_eq!(detail["status"], "COMPLETED");
    assert_eq!(detail["adjustedBins"], 1);
}

#[tokio::test]
async fn test_cancel_cycle() {
    let ctx = TestContext::spawn_demo().await;

    let (status, body) = post_json(&ctx, "/cycles/2/cancel", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "CANCELLED");

    // Terminal cycles cannot be cancelled again.
    let (status, _) = post_json(&ctx, "/cycles/2/cancel", json!({})).await;
    assert_eq!(status, 422);
}
