use chrono::NaiveDate;

use super::format;
use crate::{
    bot_handler::BotHandlerError,
    license::{License, LicenseStatus},
    service::{LicenseServiceError, RenewalOutcome},
    store::StoreError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_license() -> License {
    License {
        key: "AAAA-BBBB-CCCC-DDDD".to_string(),
        cpf_cnpj: "111.111.111-11".parse().unwrap(),
        status: LicenseStatus::Active,
        expires_at: date(2026, 3, 15),
        created_at: date(2025, 3, 15),
        plan: "profissional".to_string(),
    }
}

#[test]
fn test_activated_text() {
    let text = format::activated_text(&sample_license(), 12);

    assert!(text.contains("LICENÇA ATIVADA"));
    assert!(text.contains("111.111.111-11"));
    assert!(text.contains("profissional"));
    assert!(text.contains("2026-03-15"));
    assert!(text.contains("12 meses"));
    assert!(text.contains("<code>AAAA-BBBB-CCCC-DDDD</code>"));
}

#[test]
fn test_activated_text_escapes_plan() {
    let mut license = sample_license();
    license.plan = "<b>empresa</b>".to_string();
    let text = format::activated_text(&license, 1);

    assert!(text.contains("&lt;b&gt;empresa&lt;/b&gt;"));
    assert!(text.contains("1 mês"));
}

#[test]
fn test_renewed_text_plain_extension() {
    let outcome = RenewalOutcome {
        license: sample_license(),
        base_date: date(2026, 2, 15),
        reactivated: false,
    };
    let text = format::renewed_text(&outcome, 1);

    assert!(text.contains("LICENÇA RENOVADA"));
    assert!(text.contains("Início: 2026-02-15"));
    assert!(text.contains("Validade: 2026-03-15"));
    assert!(!text.contains("Nova chave"));
}

#[test]
fn test_renewed_text_reactivation_shows_new_key() {
    let outcome = RenewalOutcome {
        license: sample_license(),
        base_date: date(2026, 2, 15),
        reactivated: true,
    };
    let text = format::renewed_text(&outcome, 1);

    assert!(text.contains("LICENÇA REATIVADA"));
    assert!(text.contains("Nova chave: <code>AAAA-BBBB-CCCC-DDDD</code>"));
}

#[test]
fn test_cancelled_text() {
    let text = format::cancelled_text(&sample_license());
    assert!(text.contains("LICENÇA CANCELADA"));
    assert!(text.contains("111.111.111-11"));
    assert!(text.contains("AAAA-BBBB-CCCC-DDDD"));
}

#[test]
fn test_status_text_days_remaining() {
    let text = format::status_text(&sample_license(), date(2026, 3, 5));
    assert!(text.starts_with("🟢"));
    assert!(text.contains("Faltam 10d"));
    assert!(text.contains("Criada em: 2025-03-15"));
}

#[test]
fn test_status_text_expires_today() {
    let text = format::status_text(&sample_license(), date(2026, 3, 15));
    assert!(text.contains("VENCE HOJE"));
}

#[test]
fn test_status_text_overdue_shows_expired() {
    let text = format::status_text(&sample_license(), date(2026, 3, 20));
    assert!(text.starts_with("🔴"));
    assert!(text.contains("VENCIDA (5d)"));
}

#[test]
fn test_status_text_cancelled_emoji() {
    let mut license = sample_license();
    license.status = LicenseStatus::Cancelled;
    let text = format::status_text(&license, date(2026, 3, 5));
    assert!(text.starts_with("⚫"));
}

#[test]
fn test_list_text_empty() {
    assert_eq!(format::list_text(&[], date(2026, 1, 1)), "Nenhuma licença cadastrada.");
}

#[test]
fn test_list_text_masks_ids_and_counts() {
    let text = format::list_text(&[sample_license()], date(2026, 3, 5));

    assert!(text.contains("...1111"));
    assert!(!text.contains("11111111111"));
    assert!(text.contains("Total: 1"));
}

#[test]
fn test_list_text_caps_rows() {
    let licenses: Vec<License> = (0..20)
        .map(|i| {
            let mut license = sample_license();
            license.key = format!("KEY{i}");
            license
        })
        .collect();

    let text = format::list_text(&licenses, date(2026, 3, 5));
    assert!(text.contains("… e mais 5"));
    assert!(text.contains("Total: 20"));
}

#[test]
fn test_error_texts_are_distinct() {
    let cpf = "111.111.111-11".parse().unwrap();
    let errors = [
        BotHandlerError::InvalidInput("MESES deve ser um número entre 1 e 24.".to_string()),
        BotHandlerError::License(LicenseServiceError::AlreadyRegistered(cpf)),
        BotHandlerError::License(LicenseServiceError::NotFound(
            "999.999.999-99".parse().unwrap(),
        )),
        BotHandlerError::License(LicenseServiceError::Store(StoreError::Conflict)),
        BotHandlerError::License(LicenseServiceError::Store(StoreError::Transport(
            "timed out".to_string(),
        ))),
    ];

    let texts: Vec<String> = errors.iter().map(format::error_text).collect();
    for (i, a) in texts.iter().enumerate() {
        assert!(!a.is_empty());
        for b in texts.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_conflict_error_suggests_retry() {
    let error = BotHandlerError::License(LicenseServiceError::Store(StoreError::Conflict));
    let text = format::error_text(&error);
    assert!(text.contains("Repita o comando"));
    assert!(text.contains("Nada foi sobrescrito"));
}

#[test]
fn test_not_found_error_names_the_id() {
    let error = BotHandlerError::License(LicenseServiceError::NotFound(
        "999.999.999-99".parse().unwrap(),
    ));
    assert!(format::error_text(&error).contains("999.999.999-99"));
}
