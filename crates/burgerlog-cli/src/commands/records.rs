use anyhow::Result;

use burgerlog_core::schema::format_number;
use burgerlog_core::{Record, RecordId, Reviewer};
use reporting::{human, json, LedgerStats};

use crate::commands::{find_record, Session};

pub fn list(session: &Session, as_json: bool) -> Result<()> {
    let ledger = session.ledger()?;
    let records = ledger.list_all()?;
    if as_json {
        println!("{}", json::render_records(&records));
    } else {
        println!("{}", human::table(&records));
    }
    Ok(())
}

pub fn show(session: &Session, id: &str, as_json: bool) -> Result<()> {
    let ledger = session.ledger()?;
    let record = find_record(&ledger, id)?;
    if as_json {
        println!("{}", json::render_records(std::slice::from_ref(&record)));
    } else {
        println!("{}", human::card(&record));
    }
    Ok(())
}

pub fn remove(session: &Session, id: &str) -> Result<()> {
    let mut ledger = session.ledger()?;
    if ledger.remove(&RecordId::from(id))? {
        println!("Kayıt silindi: {id}");
    } else {
        println!("Kayıt bulunamadı: {id}");
    }
    Ok(())
}

pub fn stats(session: &Session, as_json: bool) -> Result<()> {
    let ledger = session.ledger()?;
    let stats = LedgerStats::from_records(&ledger.list_all()?);
    if as_json {
        println!("{}", json::render_stats(&stats));
    } else {
        println!("{}", stats.human_summary());
    }
    Ok(())
}

pub fn check(session: &Session) -> Result<()> {
    let ledger = session.ledger()?;
    let records = ledger.list_all()?;
    let lines = inconsistency_report(&records);
    if lines.is_empty() {
        println!("Tüm kayıtlar tutarlı ({} kayıt).", records.len());
    } else {
        for line in lines {
            println!("{line}");
        }
    }
    Ok(())
}

fn inconsistency_report(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter(|record| !record.is_consistent())
        .map(|record| {
            let (baba, gokce, overall) = record.recomputed();
            format!(
                "{} {}: kayıtlı {}/{}/{}, puanlardan {}/{}/{} ({}/{}/ortalama)",
                record.id(),
                record.venue(),
                format_number(record.entry(Reviewer::Baba).subtotal),
                format_number(record.entry(Reviewer::Gokce).subtotal),
                format_number(record.overall()),
                format_number(baba),
                format_number(gokce),
                format_number(overall),
                Reviewer::Baba.label(),
                Reviewer::Gokce.label(),
            )
        })
        .collect()
}
