use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn purse(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("purse").unwrap();
    cmd.env("PURSE_DATA_DIR", dir.path()).env_remove("PURSE_LOG");
    cmd
}

#[test]
fn income_creates_default_budget() {
    let dir = TempDir::new().unwrap();

    purse(&dir)
        .args(["income", "10000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget created"))
        .stdout(predicate::str::contains("Housing"))
        .stdout(predicate::str::contains("₹3000"));

    assert!(dir.path().join("data").join("budget.json").exists());
}

#[test]
fn pay_and_reject_then_status() {
    let dir = TempDir::new().unwrap();
    purse(&dir).args(["income", "10000"]).assert().success();

    purse(&dir)
        .args(["pay", "Food", "500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paid ₹500 from Food"))
        .stdout(predicate::str::contains("Remaining in Food: ₹1500"));

    purse(&dir)
        .args(["pay", "Food", "3000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("insufficient balance"))
        .stdout(predicate::str::contains("Remaining in Food: ₹1500"));

    purse(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Partially spent"));

    purse(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Accepted"))
        .stdout(predicate::str::contains("Rejected"));
}

#[test]
fn unknown_category_fails() {
    let dir = TempDir::new().unwrap();
    purse(&dir).args(["income", "10000"]).assert().success();

    purse(&dir)
        .args(["pay", "Rent", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category: Rent"));
}

#[test]
fn pay_before_income_fails() {
    let dir = TempDir::new().unwrap();

    purse(&dir)
        .args(["pay", "Food", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No budget has been set up yet"));
}

#[test]
fn fractional_amount_rejected() {
    let dir = TempDir::new().unwrap();
    purse(&dir).args(["income", "10000"]).assert().success();

    purse(&dir)
        .args(["pay", "Food", "12.50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount"));
}

#[test]
fn reset_refunds_categories() {
    let dir = TempDir::new().unwrap();
    purse(&dir).args(["income", "10000"]).assert().success();
    purse(&dir).args(["pay", "Entertainment", "1000"]).assert().success();

    purse(&dir)
        .args(["reset", "13333"])
        .assert()
        .success()
        .stdout(predicate::str::contains("₹2000"));

    purse(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Depleted").not());

    purse(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("(reset)"));
}

#[test]
fn confirm_refuses_replayed_reference() {
    let dir = TempDir::new().unwrap();
    purse(&dir).args(["income", "10000"]).assert().success();

    purse(&dir)
        .args(["confirm", "pay_42", "Utilities", "200"])
        .assert()
        .success();

    purse(&dir)
        .args(["confirm", "pay_42", "Utilities", "200"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already recorded"));

    purse(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("₹800"));
}

#[test]
fn buy_and_list_stocks() {
    let dir = TempDir::new().unwrap();

    purse(&dir)
        .args(["buy", "ACME", "150", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total ₹450.00"));

    purse(&dir)
        .args(["buy", "ACME", "150", "0"])
        .assert()
        .failure();

    purse(&dir)
        .arg("stocks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total invested: ₹450.00"));
}

#[test]
fn buy_at_fractional_price() {
    let dir = TempDir::new().unwrap();

    purse(&dir)
        .args(["buy", "ACME", "123.45", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("at ₹123.45"))
        .stdout(predicate::str::contains("total ₹246.90"));

    purse(&dir)
        .args(["buy", "ACME", "1.234", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid price"));
}

#[test]
fn savings_refuses_payments() {
    let dir = TempDir::new().unwrap();
    purse(&dir).args(["income", "10000"]).assert().success();

    purse(&dir)
        .args(["pay", "Savings", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not accept payments"));

    purse(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Savings").not());
}

#[test]
fn pay_refuses_malformed_amounts() {
    let dir = TempDir::new().unwrap();
    purse(&dir).args(["income", "10000"]).assert().success();

    for amount in ["Rent500", "abc12", "1,2,3"] {
        purse(&dir)
            .args(["pay", "Food", amount])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid amount"));
    }

    purse(&dir)
        .args(["pay", "Food", "₹-500"])
        .assert()
        .failure();

    purse(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("₹2000"));
}

#[test]
fn init_writes_settings() {
    let dir = TempDir::new().unwrap();

    purse(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Savings (15%, no payments)"));

    assert!(dir.path().join("config.json").exists());

    purse(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Currency symbol: ₹"));
}
