//! `cantera cart`: the cart stored under `CANTERA_DATA_DIR`.

use std::io::{self, Write};

use cantera_core::cart::{Cart, CartNotice};
use cantera_core::{CurrencyCode, Locale, Price, ProductId};
use cantera_storefront::config::StorefrontConfig;
use cantera_storefront::{Storefront, StorefrontError};

use super::{CommandError, emit};
use crate::OutputFormat;

/// A cart operation requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Show(OutputFormat),
    Add { slug: String, quantity: u32 },
    Update { id: i64, quantity: u32 },
    Remove { id: i64 },
    Clear,
    Privacy(bool),
}

/// Load the cart, apply `action` and print the result.
///
/// # Errors
///
/// Returns an error if configuration or storage setup fails, or when a
/// product lookup fails.
pub async fn run(action: Action, locale: Locale) -> Result<(), CommandError> {
    let config = StorefrontConfig::from_env().map_err(StorefrontError::from)?;
    let (storefront, mut notices) = Storefront::init(config)?;

    let format = match &action {
        Action::Show(format) => *format,
        _ => OutputFormat::Text,
    };

    // Resolve the product before taking the cart lock
    let new_item = match &action {
        Action::Add { slug, quantity } => {
            let content = storefront
                .content()
                .ok_or(CommandError::ContentStoreNotConfigured)?;
            let product = content
                .product_by_slug(slug)
                .await
                .map_err(StorefrontError::from)?
                .ok_or_else(|| CommandError::UnknownProduct(slug.clone()))?;
            Some(product.to_cart_item(*quantity))
        }
        _ => None,
    };

    let mut store = storefront.cart().lock().await;
    let update = match action {
        Action::Show(_) => store.snapshot(),
        Action::Add { .. } => match new_item {
            Some(item) => store.add(item),
            None => store.snapshot(),
        },
        Action::Update { id, quantity } => store.update_quantity(ProductId::new(id), quantity),
        Action::Remove { id } => store.remove(ProductId::new(id)),
        Action::Clear => store.clear(),
        Action::Privacy(enabled) => {
            notices.extend(store.set_privacy(enabled));
            tracing::info!(privacy = enabled, "Privacy mode updated");
            store.snapshot()
        }
    };
    notices.extend(update.notices.iter().cloned());
    notices.extend(store.flush());
    let privacy = store.privacy_enabled();
    drop(store);

    let mut messages = Vec::with_capacity(notices.len());
    for notice in &notices {
        messages.push(storefront.translator().notice_message(locale, notice).await);
    }

    match format {
        OutputFormat::Text => emit(|out| render_text(&update.cart, privacy, &messages, out))?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "cart": update.cart,
                "privacy": privacy,
                "notices": notices_json(&notices, &messages),
            }))?;
            emit(|out| writeln!(out, "{json}"))?;
        }
    }
    Ok(())
}

fn notices_json(notices: &[CartNotice], messages: &[String]) -> Vec<serde_json::Value> {
    notices
        .iter()
        .zip(messages)
        .map(|(notice, message)| {
            serde_json::json!({
                "level": notice.level(),
                "notice": notice,
                "message": message,
            })
        })
        .collect()
}

/// Human-readable cart listing.
pub fn render_text(
    cart: &Cart,
    privacy: bool,
    messages: &[String],
    out: &mut dyn Write,
) -> io::Result<()> {
    for message in messages {
        writeln!(out, "! {message}")?;
    }

    let money = |amount| Price::new(amount, CurrencyCode::default()).display();

    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;
    } else {
        for item in cart.items() {
            writeln!(
                out,
                "{:>6}  {:<32} {:>3} x {:>10} = {:>10}",
                item.id.to_string(),
                item.name,
                item.quantity,
                money(item.unit_price),
                money(item.line_total())
            )?;
        }
        let totals = cart.totals();
        writeln!(
            out,
            "{} item(s) in {} line(s), subtotal {}",
            totals.item_count,
            totals.line_count,
            money(totals.subtotal)
        )?;
    }

    writeln!(
        out,
        "Expires {}{}",
        cart.expires_at().format("%Y-%m-%d"),
        if privacy { " (privacy mode)" } else { "" }
    )
}
