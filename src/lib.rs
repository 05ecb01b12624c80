/*!
lu-translator maintains a table of BGP Labeled-Unicast routes from the JSON messages an ExaBGP
speaker writes to its API processes.

# Overview

Every line written by the speaker is one JSON document. The translator
1. reads and decodes one line at a time ([MessageReader]),
2. classifies the message into session-state, announce and withdraw events for the configured
   Labeled-Unicast family ([classify]),
3. normalizes path attributes and MPLS label stacks ([parse_attributes], [parse_label_stack]),
4. applies the events to the [RouteTable], keyed by `PREFIX_NEXTHOP`,
5. hands a snapshot of the table to a [RouteExporter] whenever it changed.

# Examples

```
use lu_translator::{Translator, TranslatorConfig};

let mut translator = Translator::new(TranslatorConfig::default());
translator.handle_line(r#"{"type":"update","neighbor":{"ip":"10.1.1.1","message":{"update":{
    "attribute":{"origin":"igp","med":0,"local-preference":100,"community":[[100,3]]},
    "announce":{"ipv4 nlri-mpls":{"3.3.3.3":{"192.168.35.5/32":{"label":[18]}}}}}}}}"#).unwrap();

let routes = translator.snapshot();
assert_eq!(routes.len(), 1);
assert_eq!(routes[0].route_key.as_str(), "192.168.35.5/32_3.3.3.3");
assert_eq!(routes[0].label_stack[0].label_value, 18);
```

Reading the speaker's output from stdin until it closes:

```no_run
use lu_translator::{Translator, TranslatorConfig};

let mut translator = Translator::new(TranslatorConfig::default());
let stats = translator.run(std::io::stdin().lock()).unwrap();
println!("{} messages handled", stats.messages);
```
*/

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod parser;
pub mod reader;
pub mod table;
pub mod translator;

pub use config::{TranslatorConfig, DEFAULT_NLRI};
pub use error::TranslatorError;
pub use export::{JsonFileExporter, MemoryExporter, NoopExporter, RouteExporter};
pub use models::{Attributes, Route, RouteKey};
pub use parser::{classify, parse_attributes, parse_label_stack, TranslatorEvent};
pub use reader::MessageReader;
pub use table::{RouteTable, TableChange};
pub use translator::{Translator, TranslatorStats};
