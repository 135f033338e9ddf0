//! Order Summary
//!
//! Plain-text rendering of an order, handed to the messaging transport as the
//! message body.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    items::LineItem,
    orders::{details::OrderDetails, totals::OrderTotals},
    pricing::format_price,
};

/// A renderable summary of an order.
#[derive(Debug, Clone, Copy)]
pub struct OrderSummary<'a> {
    store_name: &'a str,
    line_items: &'a [LineItem],
    details: &'a OrderDetails,
    totals: &'a OrderTotals,
}

impl<'a> OrderSummary<'a> {
    /// Create a summary for the given order parts.
    pub fn new(
        store_name: &'a str,
        line_items: &'a [LineItem],
        details: &'a OrderDetails,
        totals: &'a OrderTotals,
    ) -> Self {
        Self {
            store_name,
            line_items,
            details,
            totals,
        }
    }

    fn fmt_line_item(f: &mut Formatter<'_>, position: usize, line: &LineItem) -> FmtResult {
        writeln!(f, "{position}. *{}* ({}x)", line.item().name, line.quantity())?;
        writeln!(f, "   Preço unitário: {}", format_price(&line.item().price))?;

        if !line.add_ons().is_empty() {
            writeln!(f, "   Adicionais:")?;

            for add_on in line.add_ons() {
                writeln!(
                    f,
                    "   • {}x {} (+{})",
                    add_on.quantity,
                    add_on.name,
                    format_price(&add_on.price)
                )?;
            }
        }

        if let Some(notes) = line.notes() {
            writeln!(f, "   📝 Observações: {notes}")?;
        }

        writeln!(f, "   Subtotal: {}", format_price(&line.total_price()))?;
        writeln!(f)
    }
}

impl Display for OrderSummary<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let details = self.details;
        let totals = self.totals;

        writeln!(f, "🍔 *NOVO PEDIDO - {}*", self.store_name.to_uppercase())?;
        writeln!(f)?;

        writeln!(f, "👤 *Cliente:* {}", details.customer_name.trim())?;
        writeln!(f, "📞 *Telefone:* {}", details.customer_phone.trim())?;
        writeln!(f)?;

        writeln!(f, "🍔 *ITENS DO PEDIDO:*")?;

        for (idx, line) in self.line_items.iter().enumerate() {
            Self::fmt_line_item(f, idx + 1, line)?;
        }

        writeln!(f, "🧾 *Subtotal dos itens:* {}", format_price(&totals.subtotal))?;

        if totals.has_delivery_fee() {
            writeln!(f, "🛵 *Taxa de Entrega:* {}", format_price(&totals.delivery_fee))?;
        }

        writeln!(f, "💰 *TOTAL GERAL: {}*", format_price(&totals.total))?;
        writeln!(f)?;

        writeln!(f, "🚚 *Tipo:* {}", details.delivery_type.label())?;

        if let Some(address) = details.delivery_address() {
            writeln!(f, "📍 *Endereço:* {address}")?;
        }

        writeln!(f, "💳 *Pagamento:* {}", details.payment_method.label())?;
        writeln!(f)?;

        if let Some(notes) = details.order_notes() {
            writeln!(f, "📝 *Observações:* {notes}")?;
            writeln!(f)?;
        }

        write!(f, "Obrigado pela preferência! 🙏")
    }
}
