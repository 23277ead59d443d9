use crate::{DealCategory, Exchange};

/// One disclosed trade, normalized from a source payload entry.
///
/// Equality and hashing cover every field, so two records are duplicates
/// exactly when all of exchange, category, symbol, date, quantity, price,
/// buyer and seller match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DealRecord {
    exchange: Exchange,
    category: DealCategory,
    symbol: String,
    date: String,
    quantity: String,
    price: String,
    buyer: String,
    seller: String,
}

impl DealRecord {
    /// Build a record, trimming every text field and uppercasing the symbol.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        exchange: Exchange,
        category: DealCategory,
        symbol: impl AsRef<str>,
        date: impl AsRef<str>,
        quantity: impl AsRef<str>,
        price: impl AsRef<str>,
        buyer: impl AsRef<str>,
        seller: impl AsRef<str>,
    ) -> Self {
        Self {
            exchange,
            category,
            symbol: symbol.as_ref().trim().to_uppercase(),
            date: date.as_ref().trim().to_owned(),
            quantity: quantity.as_ref().trim().to_owned(),
            price: price.as_ref().trim().to_owned(),
            buyer: buyer.as_ref().trim().to_owned(),
            seller: seller.as_ref().trim().to_owned(),
        }
    }

    pub const fn exchange(&self) -> Exchange {
        self.exchange
    }

    pub const fn category(&self) -> DealCategory {
        self.category
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn buyer(&self) -> &str {
        &self.buyer
    }

    pub fn seller(&self) -> &str {
        &self.seller
    }
}
