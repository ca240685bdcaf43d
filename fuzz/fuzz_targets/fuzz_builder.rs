#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlnode::util::name::is_valid_name;
use xmlnode::ElementNode;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Split the input into a name, an attribute key, and text
        let mut parts = s.splitn(3, '\u{1}');
        let name = parts.next().unwrap_or_default();
        let key = parts.next().unwrap_or_default();
        let text = parts.next().unwrap_or_default();

        // Construction must agree with the name grammar and never panic
        let Ok(mut root) = ElementNode::new(name) else {
            assert!(!is_valid_name(name));
            return;
        };
        let before = root.serialize();
        if root.add_attribute(key, text).is_err() {
            assert_eq!(root.serialize(), before);
        }
        root.add_text(text);
        let _ = root.add_child_with_text(key, text);
        assert_eq!(root.serialize(), root.serialize());
    }
});
