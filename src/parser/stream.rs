//! Single forward pass over start/end events.

use std::io::BufRead;

use log::{debug, info, warn};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use super::builders::{self, Harvest};
use super::context::{LedgerContext, VoucherSource};
use super::element::Element;
use super::fields;
use crate::core::normalize::{normalize_decimal, parse_count};
use crate::core::*;

/// Elements that produce a record at their end-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordKind {
    Header,
    BankAccount,
    Account,
    Customer,
    Supplier,
    TaxTableEntry,
    TaxCodeDetails,
    Journal,
    Transaction,
    Line,
    Analysis,
    Invoice,
}

impl RecordKind {
    fn from_local_name(name: &str) -> Option<Self> {
        Some(match name {
            "Header" => Self::Header,
            "BankAccount" => Self::BankAccount,
            "Account" | "GeneralLedgerAccount" => Self::Account,
            "Customer" => Self::Customer,
            "Supplier" => Self::Supplier,
            "TaxTableEntry" => Self::TaxTableEntry,
            "TaxCodeDetails" => Self::TaxCodeDetails,
            "Journal" => Self::Journal,
            "Transaction" => Self::Transaction,
            "Line" | "TransactionLine" | "JournalLine" => Self::Line,
            "Analysis" => Self::Analysis,
            "Invoice" => Self::Invoice,
            _ => return None,
        })
    }
}

const SOURCE_DOCUMENTS: &str = "SourceDocuments";

#[derive(Debug)]
struct Frame {
    element: Element,
    /// In the document's namespace.
    qualified: bool,
    kind: Option<RecordKind>,
}

/// Innermost open frame of one of `kinds`.
fn nearest<'s>(stack: &'s [Frame], kinds: &[RecordKind]) -> Option<&'s Frame> {
    stack
        .iter()
        .rev()
        .find(|f| f.kind.is_some_and(|k| kinds.contains(&k)))
}

/// Event handler for one document. Holds the open element path, the ambient
/// journal/voucher context and the ledger under construction; nothing
/// outlives a single parse.
pub(crate) struct StreamParser<'c> {
    namespace: Option<String>,
    config: &'c LoadConfig,
    stack: Vec<Frame>,
    open_records: usize,
    source_documents_depth: usize,
    seen_root: bool,
    ctx: LedgerContext,
    ledger: Ledger,
}

impl<'c> StreamParser<'c> {
    pub fn new(namespace: Option<String>, config: &'c LoadConfig) -> Self {
        Self {
            ledger: Ledger {
                namespace: namespace.clone(),
                ..Default::default()
            },
            namespace,
            config,
            stack: Vec::new(),
            open_records: 0,
            source_documents_depth: 0,
            seen_root: false,
            ctx: LedgerContext::new(),
        }
    }

    fn is_document_ns(&self, ns: &ResolveResult<'_>) -> bool {
        match (ns, self.namespace.as_deref()) {
            (ResolveResult::Bound(n), Some(doc)) => n.as_ref() == doc.as_bytes(),
            (ResolveResult::Unbound, None) => true,
            _ => false,
        }
    }

    /// Slash-separated path of open elements, for diagnostics.
    fn path(&self) -> String {
        let names: Vec<&str> = self.stack.iter().map(|f| f.element.name.as_str()).collect();
        format!("/{}", names.join("/"))
    }

    pub fn start(&mut self, e: &BytesStart<'_>, qualified: bool) -> Result<(), SaftError> {
        if self.seen_root && self.stack.is_empty() {
            return Err(SaftError::structural("content after the root element"));
        }
        self.seen_root = true;

        let name = std::str::from_utf8(e.local_name().as_ref())
            .map_err(|_| SaftError::structural(format!("non UTF-8 element name in {}", self.path())))?
            .to_owned();
        let mut element = Element::new(name);
        for attr in e.attributes() {
            let attr = attr.map_err(|err| {
                SaftError::structural(format!("bad attribute in {}: {err}", self.path()))
            })?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| SaftError::structural(format!("bad attribute value: {err}")))?
                .into_owned();
            element.attrs.push((key, value));
        }

        let kind = if qualified {
            RecordKind::from_local_name(&element.name)
        } else {
            None
        };
        match kind {
            Some(RecordKind::Journal) => {
                let id = element.resolve(fields::journal::ID).map(str::to_owned);
                self.ctx.start_journal(id);
            }
            Some(RecordKind::Transaction) => {
                self.ctx.start_transaction();
                if let Some(v) = element.resolve(fields::transaction::VOUCHER_ID) {
                    self.ctx.offer_voucher(VoucherSource::VoucherId, v.to_owned());
                }
                if let Some(v) = element.resolve(fields::transaction::VOUCHER_NO) {
                    self.ctx.offer_voucher(VoucherSource::VoucherNo, v.to_owned());
                }
            }
            _ => {}
        }
        if qualified && element.name == SOURCE_DOCUMENTS {
            self.source_documents_depth += 1;
        }
        if kind.is_some() {
            self.open_records += 1;
        }

        self.stack.push(Frame {
            element,
            qualified,
            kind,
        });
        Ok(())
    }

    pub fn text(&mut self, text: &str) {
        if let Some(frame) = self.stack.last_mut() {
            frame.element.text.push_str(text);
        }
    }

    pub fn end(&mut self) -> Result<(), SaftError> {
        let Some(frame) = self.stack.pop() else {
            return Err(SaftError::structural("unexpected end tag"));
        };
        self.ledger.stats.elements += 1;
        if self.config.is_cancelled() {
            return Err(SaftError::Cancelled);
        }
        if frame.kind.is_some() {
            self.open_records -= 1;
        }
        if !frame.qualified {
            return Ok(());
        }
        if frame.element.name == SOURCE_DOCUMENTS {
            self.source_documents_depth = self.source_documents_depth.saturating_sub(1);
        }

        match frame.kind {
            Some(kind) => self.dispatch(kind, frame.element)?,
            None => {
                self.observe_field(&frame.element);
                // Keep the child only while an enclosing record may still harvest it.
                if self.open_records > 0 {
                    if let Some(parent) = self.stack.last_mut() {
                        parent.element.children.push(frame.element);
                    }
                }
            }
        }
        Ok(())
    }

    /// Identity and control-total fields the context needs as soon as they close.
    fn observe_field(&mut self, el: &Element) {
        let Some(parent) = self.stack.last() else {
            return;
        };
        let Some(value) = el.text() else {
            return;
        };
        let parent_kind = parent.kind;
        let in_totals = parent.element.name == fields::totals::CONTAINER;
        match (parent_kind, el.name.as_str()) {
            (Some(RecordKind::Journal), "JournalID") => {
                self.ctx.set_journal_id(value.to_owned());
            }
            (Some(RecordKind::Transaction), "VoucherNo") => {
                self.ctx
                    .offer_voucher(VoucherSource::VoucherNo, value.to_owned());
            }
            (Some(RecordKind::Transaction), "VoucherID") => {
                self.ctx
                    .offer_voucher(VoucherSource::VoucherId, value.to_owned());
            }
            (None, name) if in_totals => {
                let totals = &mut self.ledger.declared_totals;
                match name {
                    fields::totals::NUMBER_OF_ENTRIES => totals.number_of_entries = parse_count(value),
                    fields::totals::TOTAL_DEBIT => totals.total_debit = normalize_decimal(value),
                    fields::totals::TOTAL_CREDIT => totals.total_credit = normalize_decimal(value),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    /// Run the record builder for `kind`; the element is released afterwards.
    fn dispatch(&mut self, kind: RecordKind, el: Element) -> Result<(), SaftError> {
        match kind {
            RecordKind::Header => {
                let rec = builders::header(&mut Harvest::new(&el, &mut self.ledger.stats));
                self.ledger.headers.push(rec);
            }
            RecordKind::BankAccount => {
                let holder = match nearest(&self.stack, &[RecordKind::Customer, RecordKind::Supplier])
                    .and_then(|f| f.kind)
                {
                    Some(RecordKind::Customer) => BankAccountHolder::Customer,
                    Some(RecordKind::Supplier) => BankAccountHolder::Supplier,
                    _ => BankAccountHolder::Company,
                };
                let rec =
                    builders::bank_account(&mut Harvest::new(&el, &mut self.ledger.stats), holder);
                self.ledger.bank_accounts.push(rec);
            }
            RecordKind::Account => {
                let rec = builders::account(&mut Harvest::new(&el, &mut self.ledger.stats));
                self.ledger.accounts.push(rec);
            }
            RecordKind::Customer | RecordKind::Supplier => {
                let party_kind = if kind == RecordKind::Customer {
                    PartyKind::Customer
                } else {
                    PartyKind::Supplier
                };
                let (rec, accounts) =
                    builders::party(&mut Harvest::new(&el, &mut self.ledger.stats), party_kind);
                match party_kind {
                    PartyKind::Customer => self.ledger.customers.push(rec),
                    PartyKind::Supplier => self.ledger.suppliers.push(rec),
                }
                self.ledger.party_accounts.extend(accounts);
            }
            RecordKind::TaxCodeDetails => {
                let rec = builders::tax_code(&mut Harvest::new(&el, &mut self.ledger.stats));
                self.ledger.tax_codes.push(rec);
            }
            RecordKind::TaxTableEntry => {
                // Flat entries carry the code directly; nested ones were
                // already emitted per TaxCodeDetails.
                if el.has_child("TaxCode") {
                    let rec = builders::tax_code(&mut Harvest::new(&el, &mut self.ledger.stats));
                    self.ledger.tax_codes.push(rec);
                }
            }
            RecordKind::Journal => {
                let rec = builders::journal(&mut Harvest::new(&el, &mut self.ledger.stats), &self.ctx);
                self.ledger.journals.push(rec);
                self.ctx.end_journal();
            }
            RecordKind::Transaction => {
                let rec = builders::voucher(&mut Harvest::new(&el, &mut self.ledger.stats), &self.ctx);
                self.ledger.vouchers.push(rec);
                self.ctx.end_transaction();
            }
            RecordKind::Line => {
                if self.source_documents_depth > 0 {
                    self.ledger.stats.skipped_document_lines += 1;
                    return Ok(());
                }
                let rec = builders::transaction_line(
                    &mut Harvest::new(&el, &mut self.ledger.stats),
                    &self.ctx,
                );
                if rec.journal_id.is_none() {
                    self.ledger.stats.lines_without_journal += 1;
                }
                self.ctx.add_line(rec.debit, rec.credit)?;
                self.ledger.lines.push(rec);
            }
            RecordKind::Analysis => {
                // Breakdowns of invoice lines, not of ledger lines.
                if self.source_documents_depth > 0 {
                    return Ok(());
                }
                let line = nearest(&self.stack, &[RecordKind::Line]).map(|f| &f.element);
                let rec = builders::analysis_line(
                    &mut Harvest::new(&el, &mut self.ledger.stats),
                    line,
                    &self.ctx,
                );
                self.ledger.analysis_lines.push(rec);
            }
            RecordKind::Invoice => {
                let parent = self.stack.last().map(|f| f.element.name.as_str());
                let invoice_kind = match parent {
                    Some(fields::invoice::SALES_CONTAINER) => InvoiceKind::Sales,
                    Some(fields::invoice::PURCHASE_CONTAINER) => InvoiceKind::Purchase,
                    _ => return Ok(()),
                };
                let rec = builders::source_invoice(
                    &mut Harvest::new(&el, &mut self.ledger.stats),
                    invoice_kind,
                );
                self.ledger.invoices.push(rec);
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Result<Ledger, SaftError> {
        if !self.seen_root {
            return Err(SaftError::structural("document has no root element"));
        }
        if !self.stack.is_empty() {
            return Err(SaftError::structural(format!(
                "document ended inside {}",
                self.path()
            )));
        }
        let ledger = self.ledger;
        let stats = &ledger.stats;
        if stats.numeric_failures > 0 {
            warn!(
                "{} of {} numeric fields could not be parsed ({:.1}%)",
                stats.numeric_failures,
                stats.numeric_fields,
                stats.numeric_failure_rate() * 100.0
            );
        }
        if stats.lines_without_journal > 0 {
            warn!("{} lines outside any journal", stats.lines_without_journal);
        }
        debug!(
            "records: {} accounts, {} customers, {} suppliers, {} journals, {} vouchers, {} analysis lines, {} invoices",
            ledger.accounts.len(),
            ledger.customers.len(),
            ledger.suppliers.len(),
            ledger.journals.len(),
            ledger.vouchers.len(),
            ledger.analysis_lines.len(),
            ledger.invoices.len()
        );
        info!(
            "parsed {} elements into {} transaction lines",
            stats.elements,
            ledger.lines.len()
        );
        Ok(ledger)
    }
}

/// Parse a whole document whose root namespace is already known.
pub(crate) fn parse_stream<R: BufRead>(
    reader: R,
    namespace: Option<String>,
    config: &LoadConfig,
) -> Result<Ledger, SaftError> {
    let mut reader = NsReader::from_reader(reader);
    reader.config_mut().trim_text(true);
    let mut parser = StreamParser::new(namespace, config);
    let mut buf = Vec::new();

    loop {
        let (ns, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok(pair) => pair,
            Err(e) => {
                return Err(SaftError::structural(format!(
                    "malformed XML in {}: {e}",
                    parser.path()
                )));
            }
        };
        match event {
            Event::Start(e) => {
                let qualified = parser.is_document_ns(&ns);
                parser.start(&e, qualified)?;
            }
            Event::Empty(e) => {
                let qualified = parser.is_document_ns(&ns);
                parser.start(&e, qualified)?;
                parser.end()?;
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| {
                    SaftError::structural(format!("bad text in {}: {err}", parser.path()))
                })?;
                parser.text(&text);
            }
            Event::CData(e) => {
                let text = std::str::from_utf8(&e).map_err(|_| {
                    SaftError::structural(format!("non UTF-8 CDATA in {}", parser.path()))
                })?;
                parser.text(text);
            }
            Event::End(_) => parser.end()?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    parser.finish()
}
