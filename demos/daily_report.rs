//! Walk through one working day: filter GPS samples and bill the hours.
//!
//! Run with: cargo run --example daily_report

use chrono::{FixedOffset, NaiveDate};
use fieldtrack::clock::span_minutes;
use fieldtrack::overtime::{classify_day, DayKind, OvertimePolicy};
use fieldtrack::{
    compute_billing_totals, format_hm, format_hm_dec, Category, RateTable, TrackConfig,
    TrackJournal, TrackPoint,
};

fn main() -> fieldtrack::Result<()> {
    let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
    let start = date.and_hms_opt(7, 0, 0).unwrap().and_utc().timestamp_millis();
    let offset = FixedOffset::east_opt(0).unwrap();

    // Samples from the phone: a drive north, one duplicate and one GPS jump
    let samples = vec![
        TrackPoint::new(46.0500, 14.5000, start).with_accuracy(6.0),
        TrackPoint::new(46.0500, 14.5000, start + 2_000).with_accuracy(6.0),
        TrackPoint::new(46.0550, 14.5000, start + 60_000).with_accuracy(8.0),
        TrackPoint::new(46.1500, 14.5000, start + 65_000).with_accuracy(9.0),
        TrackPoint::new(46.0600, 14.5010, start + 120_000).with_accuracy(7.0),
        TrackPoint::new(46.0650, 14.5020, start + 180_000).with_accuracy(75.0),
    ];

    let mut journal = TrackJournal::new(TrackConfig::default());

    println!("GPS samples\n");
    for sample in samples {
        let decision = journal.record(sample, offset)?;
        println!("  t+{:>4}s  {:?}", (sample.epoch_millis - start) / 1000, decision);
    }

    if let Some(track) = journal.day(date) {
        println!("\nAccepted {} points, {:.0}m driven\n", track.points().len(), track.distance_m());
    }

    // Billing for the 07:00-18:30 shift
    let worked = span_minutes("07:00", "18:30")?;
    let buckets = classify_day(worked, DayKind::from_date(date, false), &OvertimePolicy::default());
    let rates = RateTable::from_partial([(Category::Ot50, 1.25)]);
    let totals = compute_billing_totals(&buckets, &rates, Some(15));

    println!("Billing ({} worked)\n", format_hm(i64::from(worked)));
    for result in totals.by_category.iter().filter(|r| r.minutes != 0) {
        println!(
            "  {:<8} {:>8} x{:.2}  premium {}",
            result.category.key(),
            format_hm(result.minutes),
            result.factor,
            format_hm(result.premium_min)
        );
    }
    println!(
        "\n  base {}  premium {}  payable {} ({})",
        format_hm(totals.base_min),
        format_hm(totals.premium_min),
        format_hm(totals.payable_min),
        format_hm_dec(totals.payable_min, 2)
    );

    Ok(())
}
