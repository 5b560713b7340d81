use crate::domain::model::PartnerLinkDecl;
use crate::utils::error::Result;
use crate::xml::XmlDocument;

/// Liveness classification of every partner link in one process
/// document. Declarations without a name are left alone and logged.
#[derive(Debug, Default)]
pub struct ReachabilityAnalysis {
    pub used: Vec<PartnerLinkDecl>,
    pub inbound: Vec<PartnerLinkDecl>,
    pub unreferenced: Vec<PartnerLinkDecl>,
}

/// Classifies partner links against the invoke activities of the same
/// document. A link is live when some invoke names it (case does not
/// matter) or when it carries myRole and can receive inbound calls.
pub fn analyze(document: &XmlDocument) -> Result<ReachabilityAnalysis> {
    let invoke_refs = document.attribute_values("invoke", "partnerLink")?;
    let mut analysis = ReachabilityAnalysis::default();

    for snapshot in document.elements("partnerLink")? {
        let Some(name) = snapshot.attr("name") else {
            tracing::warn!(
                "partner link without a name attribute in {}, leaving it in place",
                document.path.display()
            );
            continue;
        };

        let decl = PartnerLinkDecl {
            name: name.to_string(),
            link_type: snapshot.attr("partnerLinkType").map(str::to_string),
            my_role: snapshot.attr("myRole").map(str::to_string),
        };

        if invoke_refs.iter().any(|r| r.eq_ignore_ascii_case(name)) {
            analysis.used.push(decl);
        } else if decl.my_role.is_some() {
            analysis.inbound.push(decl);
        } else {
            analysis.unreferenced.push(decl);
        }
    }

    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn doc(xml: &str) -> XmlDocument {
        XmlDocument::parse(PathBuf::from("Process.bpel"), xml.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn classifies_invoked_inbound_and_unreferenced() {
        let d = doc(
            r#"<process>
  <partnerLinks>
    <partnerLink name="Billing" partnerLinkType="p:BillingLT" partnerRole="biller"/>
    <partnerLink name="Entry" partnerLinkType="p:EntryLT" myRole="receiver"/>
    <partnerLink name="Audit" partnerLinkType="p:AuditLT" partnerRole="auditor"/>
  </partnerLinks>
  <invoke partnerLink="Billing"/>
</process>"#,
        );

        let analysis = analyze(&d).unwrap();
        assert_eq!(analysis.used.len(), 1);
        assert_eq!(analysis.used[0].name, "Billing");
        assert_eq!(analysis.inbound.len(), 1);
        assert_eq!(analysis.inbound[0].name, "Entry");
        assert_eq!(analysis.unreferenced.len(), 1);
        assert_eq!(analysis.unreferenced[0].name, "Audit");
        assert_eq!(
            analysis.unreferenced[0].link_type.as_deref(),
            Some("p:AuditLT")
        );
    }

    #[test]
    fn invoke_reference_matches_case_insensitively() {
        let d = doc(
            r#"<process>
  <partnerLinks>
    <partnerLink name="BillingService"/>
  </partnerLinks>
  <invoke partnerLink="billingservice"/>
</process>"#,
        );

        let analysis = analyze(&d).unwrap();
        assert_eq!(analysis.used.len(), 1);
        assert!(analysis.unreferenced.is_empty());
    }

    #[test]
    fn nameless_link_is_skipped() {
        let d = doc(
            r#"<process>
  <partnerLinks>
    <partnerLink partnerLinkType="p:LostLT"/>
  </partnerLinks>
</process>"#,
        );

        let analysis = analyze(&d).unwrap();
        assert!(analysis.used.is_empty());
        assert!(analysis.inbound.is_empty());
        assert!(analysis.unreferenced.is_empty());
    }

    #[test]
    fn myrole_keeps_a_link_without_invokes() {
        let d = doc(
            r#"<process>
  <partnerLinks>
    <partnerLink name="Client" myRole="provider"/>
  </partnerLinks>
</process>"#,
        );

        let analysis = analyze(&d).unwrap();
        assert_eq!(analysis.inbound.len(), 1);
        assert!(analysis.unreferenced.is_empty());
    }
}
