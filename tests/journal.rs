use chrono::{FixedOffset, TimeZone, Utc};
use rust_decimal_macros::dec;

use trade_journal::domain::repository::{Outcome, TradeRepository};
use trade_journal::{
    Dashboard, Direction, Grade, JournalService, JsonTradeStore, NewTrade, Ticker, Timeframe,
    TradeFilter,
};

fn journal_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("trade_journal_it_{}_{}.json", name, std::process::id()))
}

#[tokio::test]
async fn journal_to_dashboard() {
    let path = journal_path("dashboard");
    let _ = tokio::fs::remove_file(&path).await;

    let utc = FixedOffset::east_opt(0).unwrap();
    let service = JournalService::new(JsonTradeStore::open(&path).await.unwrap(), utc);

    let monday = Utc.with_ymd_and_hms(2024, 10, 7, 9, 30, 0).unwrap();
    let tuesday = Utc.with_ymd_and_hms(2024, 10, 8, 14, 0, 0).unwrap();

    // 3R planned long closed at +2R
    let long = service
        .open_trade(
            NewTrade::open(Direction::Long, monday, dec!(100.00000), dec!(95.00000), dec!(115.00000))
                .with_ticker(Ticker::new("ES").unwrap())
                .with_timeframe(Timeframe::new("5m").unwrap())
                .with_entry_grade(Grade::A),
        )
        .await
        .unwrap();
    service
        .close_trade(long.id, monday + chrono::Duration::hours(2), dec!(110.00000))
        .await
        .unwrap();

    // Same day short stopped out for -1R
    service
        .open_trade(
            NewTrade::open(Direction::Short, monday, dec!(50.00000), dec!(55.00000), dec!(40.00000))
                .closed_at(monday + chrono::Duration::hours(1), dec!(55.00000)),
        )
        .await
        .unwrap();

    // Tuesday short still open
    service
        .open_trade(NewTrade::open(
            Direction::Short,
            tuesday,
            dec!(50.00000),
            dec!(55.00000),
            dec!(40.00000),
        ))
        .await
        .unwrap();

    let summary = match service.dashboard().await.unwrap() {
        Dashboard::Ready(summary) => summary,
        other => panic!("expected figures, got {:?}", other),
    };
    assert_eq!(summary.trade_count, 3);
    assert_eq!(summary.win_count, 1);
    assert_eq!(summary.loss_count, 1);
    assert_eq!(summary.strike_rate, dec!(50.0));
    assert_eq!(summary.average_winner, dec!(2.00));
    assert_eq!(summary.average_loser, dec!(-1.00));
    assert_eq!(summary.expectancy, dec!(0.50));
    assert_eq!(summary.winning_days_count, 1);
    assert_eq!(summary.losing_days_count, 1);
    assert_eq!(summary.winning_day_percent, dec!(50.0));

    let winners = service
        .trades(&TradeFilter::all().outcome(Outcome::Winner))
        .await
        .unwrap();
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].to_string(), "LONG ES at 09:30-07/10/2024");

    let shorts = service
        .trades(&TradeFilter::all().direction(Direction::Short))
        .await
        .unwrap();
    assert_eq!(shorts.len(), 2);

    // The file carries the whole journal across restarts.
    drop(service);
    let reopened = JsonTradeStore::open(&path).await.unwrap();
    assert_eq!(reopened.count().await.unwrap(), 3);

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn empty_journal_shows_no_data() {
    let service = JournalService::new(
        JsonTradeStore::in_memory(),
        FixedOffset::east_opt(0).unwrap(),
    );

    let dashboard = service.dashboard().await.unwrap();
    assert_eq!(dashboard, Dashboard::NoData { trade_count: 0 });

    let json = serde_json::to_value(&dashboard).unwrap();
    assert_eq!(json["status"], "no_data");
    assert_eq!(json["trade_count"], 0);
}
