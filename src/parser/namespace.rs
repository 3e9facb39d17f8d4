use std::io::BufRead;

use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;

use crate::core::SaftError;

/// The conventional SAF-T namespace. Only used as a default for generated
/// documents: parsing always binds to what the document itself declares.
pub const SAFT_NAMESPACE: &str = "urn:StandardAuditFile-Tax";

/// Read up to the root element and return its namespace URI.
///
/// `None` means the root is not in any namespace. Exporters vary the URI
/// (`urn:StandardAuditFile-Taxation-Financial:NO`, ...) while keeping the
/// element shapes, so the result is bound to one document only.
pub fn detect_namespace<R: BufRead>(reader: R) -> Result<Option<String>, SaftError> {
    let mut reader = NsReader::from_reader(reader);
    let mut buf = Vec::new();
    loop {
        match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, Event::Start(_) | Event::Empty(_))) => {
                return match ns {
                    ResolveResult::Bound(ns) => String::from_utf8(ns.as_ref().to_vec())
                        .map(Some)
                        .map_err(|_| SaftError::structural("root namespace is not valid UTF-8")),
                    ResolveResult::Unbound => Ok(None),
                    ResolveResult::Unknown(prefix) => Err(SaftError::structural(format!(
                        "root element uses undeclared prefix {:?}",
                        String::from_utf8_lossy(&prefix)
                    ))),
                };
            }
            Ok((_, Event::Eof)) => {
                return Err(SaftError::structural("document has no root element"));
            }
            Ok(_) => {}
            Err(e) => {
                return Err(SaftError::structural(format!(
                    "malformed XML before root element: {e}"
                )));
            }
        }
        buf.clear();
    }
}
