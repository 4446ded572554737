use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use super::TestApp;
use crate::summary::{engine::DateRange, service::today};

async fn seed(app: &TestApp, token: &str) -> anyhow::Result<()> {
    let category = app.category(token, "Household").await?;
    let expenses = [
        json!({ "title": "Groceries", "amount": 42.50, "categoryId": category,
                "type": "one-time", "date": "2025-03-05" }),
        json!({ "title": "Rent", "amount": 900, "categoryId": category,
                "type": "recurring", "startDate": "2025-01-10" }),
        json!({ "title": "Gym", "amount": "30", "categoryId": category,
                "type": "recurring", "startDate": "2025-01-10", "endDate": "2025-02-15" }),
        json!({ "title": "Later", "amount": 5, "categoryId": category,
                "type": "one-time", "date": "2025-04-01" }),
    ];
    for e in expenses {
        let (status, body) = app.post("/api/expenses", token, e).await?;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }
    let incomes = [
        json!({ "title": "Salary", "amount": 2000, "date": "2025-03-31" }),
        json!({ "title": "Bonus", "amount": 100, "date": "2025-02-28" }),
    ];
    for i in incomes {
        let (status, body) = app.post("/api/incomes", token, i).await?;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }
    Ok(())
}

fn totals(body: &Value) -> (f64, f64, f64) {
    (
        body["totalIncome"].as_f64().unwrap(),
        body["totalExpense"].as_f64().unwrap(),
        body["balance"].as_f64().unwrap(),
    )
}

#[tokio::test]
async fn example_scenario() -> anyhow::Result<()> {
    let app = TestApp::new();
    let (status, _) = app
        .send(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "email": "a@x.com", "password": "secret1" })),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, login) = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "a@x.com", "password": "secret1" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    let token = login["token"].as_str().unwrap().to_string();

    let category = app.category(&token, "Food").await?;
    let (status, expense) = app
        .post(
            "/api/expenses",
            &token,
            json!({
                "title": "Groceries",
                "amount": 42.50,
                "categoryId": category,
                "type": "one-time",
                "date": "2025-03-05",
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(expense["userId"], login["user"]["id"]);
    assert_eq!(expense["amount"], 42.5);
    assert_eq!(expense["date"], "2025-03-05");
    assert_eq!(expense["type"], "one-time");

    let (other, _) = app.signup("b@x.com").await?;
    let uri = format!("/api/expenses/{}", expense["id"].as_str().unwrap());
    let (status, _) = app.send(Method::DELETE, &uri, Some(&other), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn monthly_summary_counts_recurring_overlap() -> anyhow::Result<()> {
    let app = TestApp::new();
    let (token, _) = app.signup("a@x.com").await?;
    seed(&app, &token).await?;

    let (status, march) = app.get("/summary/monthly?month=2025-03", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(totals(&march), (2000.0, 942.5, 1057.5));
    assert_eq!(march["start"], "2025-03-01");
    assert_eq!(march["end"], "2025-03-31");

    let (_, feb) = app.get("/summary/monthly?month=2025-02", &token).await?;
    assert_eq!(totals(&feb), (100.0, 930.0, -830.0));

    let (_, dec) = app.get("/summary/monthly?month=2024-12", &token).await?;
    assert_eq!(totals(&dec), (0.0, 0.0, 0.0));
    Ok(())
}

#[tokio::test]
async fn explicit_month_range_equals_monthly_summary() -> anyhow::Result<()> {
    let app = TestApp::new();
    let (token, _) = app.signup("a@x.com").await?;
    seed(&app, &token).await?;

    let (_, monthly) = app.get("/summary/monthly?month=2025-03", &token).await?;
    let (status, range) = app
        .get("/summary?start=2025-03-01&end=2025-03-31", &token)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(monthly, range);

    // Recurring records count once per range, not once per month.
    let (_, quarter) = app
        .get("/summary?start=2025-01-01&end=2025-03-31", &token)
        .await?;
    assert_eq!(totals(&quarter), (2100.0, 972.5, 1127.5));
    Ok(())
}

#[tokio::test]
async fn bad_ranges_are_rejected() -> anyhow::Result<()> {
    let app = TestApp::new();
    let (token, _) = app.signup("a@x.com").await?;

    for uri in [
        "/summary?start=2025-03-31&end=2025-03-01",
        "/summary?start=2025-03-01",
        "/summary?start=soon&end=2025-03-01",
        "/summary/monthly?month=2025-13",
        "/api/expenses?start=2025-03-31&end=2025-03-01",
    ] {
        let (status, body) = app.get(uri, &token).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}: {body}");
    }
    Ok(())
}

#[tokio::test]
async fn summaries_only_see_the_callers_records() -> anyhow::Result<()> {
    let app = TestApp::new();
    let (alice, _) = app.signup("a@x.com").await?;
    let (bob, _) = app.signup("b@x.com").await?;
    seed(&app, &alice).await?;

    let (_, summary) = app.get("/summary/monthly?month=2025-03", &bob).await?;
    assert_eq!(totals(&summary), (0.0, 0.0, 0.0));
    Ok(())
}

#[tokio::test]
async fn alert_uses_the_current_month() -> anyhow::Result<()> {
    let app = TestApp::new();
    let (token, _) = app.signup("a@x.com").await?;

    let (status, alert) = app.get("/summary/alerts", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alert, json!({ "exceeded": false, "message": "budget respected" }));

    let category = app.category(&token, "Food").await?;
    let first_of_month = DateRange::month_of(today()).start().to_string();
    app.post(
        "/api/expenses",
        &token,
        json!({ "title": "Party", "amount": 150, "categoryId": category,
                "type": "one-time", "date": first_of_month }),
    )
    .await?;
    app.post(
        "/api/incomes",
        &token,
        json!({ "title": "Gift", "amount": 100, "date": first_of_month }),
    )
    .await?;

    let (_, alert) = app.get("/summary/alerts", &token).await?;
    assert_eq!(alert["exceeded"], true);
    assert_eq!(alert["amount"], 50.0);
    assert_eq!(alert["message"], "budget exceeded by 50.00");
    Ok(())
}

#[tokio::test]
async fn expense_list_filters_by_range() -> anyhow::Result<()> {
    let app = TestApp::new();
    let (token, _) = app.signup("a@x.com").await?;
    seed(&app, &token).await?;

    let (_, all) = app.get("/api/expenses", &token).await?;
    assert_eq!(all.as_array().map(Vec::len), Some(4));
    assert_eq!(all[0]["title"], "Later");

    let (_, march) = app
        .get("/api/expenses?start=2025-03-01&end=2025-03-31", &token)
        .await?;
    let titles: Vec<&str> = march
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["title"].as_str())
        .collect();
    assert_eq!(titles, ["Groceries", "Rent"]);
    Ok(())
}
