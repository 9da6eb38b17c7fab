//! Canonical identifier normalization.
//!
//! Display names of messages, services, and methods are rewritten to Pascal
//! case in place. The rename is visible to every later consumer of the same
//! model, so the emission driver runs this exactly once per target file,
//! before any code is emitted; no other component may rename.

use crate::helper;
use httpgw_descriptor::node::File;

/// Rewrite every display name in `file` to its canonical casing.
pub fn file(file: &mut File) {
    for msg in &mut file.messages {
        msg.name = helper::pascal(&msg.name);
    }
    for svc in &mut file.services {
        svc.name = helper::pascal(&svc.name);
        for meth in &mut svc.methods {
            meth.name = helper::pascal(&meth.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpgw_descriptor::node::{Message, Method, Service};

    #[test]
    fn renames_every_display_name_once() {
        let mut f = File {
            name: "t.proto".to_string(),
            package: "t".to_string(),
            messages: vec![Message {
                name: "get_item_request".to_string(),
                fields: vec![],
            }],
            services: vec![Service {
                name: "item_service".to_string(),
                additional_imports: vec![],
                methods: vec![Method {
                    name: "get_item".to_string(),
                    request_type: ".t.get_item_request".to_string(),
                    response_type: ".t.get_item_response".to_string(),
                    client_streaming: false,
                    server_streaming: false,
                    bindings: vec![],
                    comment: None,
                }],
            }],
        };

        file(&mut f);
        assert_eq!(f.messages[0].name, "GetItemRequest");
        assert_eq!(f.services[0].name, "ItemService");
        assert_eq!(f.services[0].methods[0].name, "GetItem");

        // idempotent, so an accidental second pass cannot corrupt names
        file(&mut f);
        assert_eq!(f.services[0].methods[0].name, "GetItem");
    }
}
