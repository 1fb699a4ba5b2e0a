//! # Invoice Command
//!
//! Produces the invoice for the last placed order again, e.g. after the
//! first attempt failed or the file was lost.

use std::path::PathBuf;

use pahana_invoice::write_invoice_to_dir;
use pahana_store::KeyValueStore;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub async fn last<S: KeyValueStore>(
    state: &mut AppState<S>,
    out: Option<PathBuf>,
) -> AppResult<String> {
    let order = state.history.last().await?.ok_or(AppError::NoOrder)?;
    let out_dir = out.unwrap_or_else(|| state.config.invoice_dir());

    let path = write_invoice_to_dir(
        &order,
        &out_dir,
        &state.config.invoice_layout(),
        &state.config.currency_symbol,
    )?;
    state
        .notifications
        .success(format!("Invoice for order {} saved", order.id));
    Ok(format!("Invoice saved to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::{add, BookArgs};
    use crate::commands::checkout::{checkout, CheckoutArgs};
    use crate::commands::test_support::memory_state;

    #[tokio::test]
    async fn test_no_order_yet() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = memory_state(dir.path()).await;
        assert!(matches!(last(&mut state, None).await, Err(AppError::NoOrder)));
    }

    #[tokio::test]
    async fn test_rerenders_last_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = memory_state(dir.path()).await;
        add(
            &mut state,
            BookArgs {
                id: "1".to_string(),
                title: "Dune".to_string(),
                price: "10".to_string(),
                author: None,
            },
        )
        .await
        .unwrap();
        checkout(
            &mut state,
            CheckoutArgs {
                tier: "overnight".to_string(),
                name: "A Reader".to_string(),
                address: "Kandy".to_string(),
                phone: "0771234567".to_string(),
                email: "reader@pahana.lk".to_string(),
                payment: "paypal".to_string(),
                ..CheckoutArgs::default()
            },
        )
        .await
        .unwrap();

        let elsewhere = dir.path().join("copies");
        let output = last(&mut state, Some(elsewhere.clone())).await.unwrap();

        let order = state.history.last().await.unwrap().unwrap();
        let path = elsewhere.join(format!("invoice-{}.pdf", order.id));
        assert!(path.exists());
        assert_eq!(output, format!("Invoice saved to {}", path.display()));
    }
}
