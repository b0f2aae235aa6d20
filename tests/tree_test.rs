extern crate plist_rs;

use plist_rs::dump::dump;
use plist_rs::error::PlistError;
use plist_rs::parse::parse;
use plist_rs::spec::{Kind, PlistDate};
use plist_rs::tree::{PlistNode, PlistTree};

/// Builds `{ "name" = "Alice", "age" = 37, "tags" = ( true, <0102> ) }`.
fn sample_tree() -> (PlistTree, plist_rs::tree::NodeId) {
    let mut tree = PlistTree::new();
    let dict = tree.new_dict();

    let name = tree.new_string("Alice");
    tree.dict_set(dict, "name", name).unwrap();
    let age = tree.new_integer(37);
    tree.dict_set(dict, "age", age).unwrap();

    let tags = tree.new_array();
    let flag = tree.new_boolean(true);
    tree.array_append(tags, flag).unwrap();
    let data = tree.new_data(&[1, 2]).unwrap();
    tree.array_append(tags, data).unwrap();
    tree.dict_set(dict, "tags", tags).unwrap();

    (tree, dict)
}

/// Checks the structural invariants over every reachable node: parent
/// kinds, key/child count agreement, and key-name uniqueness.
fn check_invariants(root: PlistNode) {
    for (_, node) in root.dfs() {
        match node.parent() {
            None => assert_eq!(node.id(), root.id()),
            Some(parent) => match parent.kind() {
                Kind::Dict => assert_eq!(node.kind(), Kind::Key),
                Kind::Key | Kind::Array => assert_ne!(node.kind(), Kind::Key),
                other => panic!("invalid parent kind {}", other),
            },
        }

        if node.kind() == Kind::Dict {
            let mut names: Vec<&str> = node.children().map(|k| k.key_name().unwrap()).collect();
            assert_eq!(names.len(), node.len());
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), node.len(), "duplicate key names");
        }
    }
}

#[test]
fn constructors_produce_parentless_nodes() {
    let mut tree = PlistTree::new();
    let date = PlistDate {
        year: 2001,
        month: 11,
        day: 12,
        hour: 18,
        minute: 31,
        second: 1,
        utc_offset: 0,
    };

    let nodes = [
        (tree.new_dict(), Kind::Dict),
        (tree.new_array(), Kind::Array),
        (tree.new_string("s"), Kind::String),
        (tree.new_integer(-5), Kind::Integer),
        (tree.new_real(0.5), Kind::Real),
        (tree.new_boolean(false), Kind::Boolean),
    ];
    let data = tree.new_data(&[0xab]).unwrap();
    let when = tree.new_date(&date);

    for (id, kind) in nodes.iter() {
        let node = tree.node(*id).unwrap();
        assert_eq!(node.kind(), *kind);
        assert!(node.parent().is_none());
    }
    assert_eq!(tree.node(data).unwrap().as_data(), Some(&[0xab][..]));
    assert_eq!(tree.node(when).unwrap().as_date(), Some(&date));
}

#[test]
fn empty_data_is_rejected() {
    let mut tree = PlistTree::new();
    assert!(matches!(
        tree.new_data(b""),
        Err(PlistError::InvalidParameter(_))
    ));
}

#[test]
fn formatted_string_constructor() {
    let mut tree = PlistTree::new();
    let id = tree.new_string_fmt(format_args!("{}-{:02}", "v", 7));
    assert_eq!(tree.node(id).unwrap().as_str(), Some("v-07"));
}

#[test]
fn dict_set_get_has_and_order() {
    let (tree, dict) = sample_tree();
    let root = tree.node(dict).unwrap();

    assert_eq!(root.len(), 3);
    assert!(tree.dict_has(dict, "age"));
    assert!(!tree.dict_has(dict, "missing"));
    assert!(tree.dict_get(dict, "missing").is_none());

    let names: Vec<&str> = root.children().map(|k| k.key_name().unwrap()).collect();
    assert_eq!(names, vec!["name", "age", "tags"]);

    check_invariants(root);
}

#[test]
fn dict_set_replaces_and_releases_the_old_entry() {
    let mut tree = PlistTree::new();
    let dict = tree.new_dict();
    let first = tree.new_string("first");
    tree.dict_set(dict, "k", first).unwrap();
    let baseline = tree.node_count();

    let second = tree.new_string("second");
    tree.dict_set(dict, "k", second).unwrap();

    // Old key and value are gone; the node count is unchanged.
    assert_eq!(tree.node_count(), baseline);
    assert_eq!(tree.node(dict).unwrap().len(), 1);
    assert_eq!(
        tree.node(dict).unwrap().get("k").unwrap().as_str(),
        Some("second")
    );
    // The replacement sits at the tail of the iteration order.
    let names: Vec<&str> = tree
        .node(dict)
        .unwrap()
        .children()
        .map(|k| k.key_name().unwrap())
        .collect();
    assert_eq!(names, vec!["k"]);
}

#[test]
fn attaching_an_attached_node_fails_and_leaves_it_in_place() {
    let mut tree = PlistTree::new();
    let a = tree.new_dict();
    let b = tree.new_dict();
    let value = tree.new_integer(1);

    tree.dict_set(a, "v", value).unwrap();
    assert_eq!(
        tree.dict_set(b, "v", value),
        Err(PlistError::AlreadyAttached)
    );
    let array = tree.new_array();
    assert_eq!(
        tree.array_append(array, value),
        Err(PlistError::AlreadyAttached)
    );

    // Still attached under its original key in `a`.
    assert_eq!(tree.node(a).unwrap().get("v").unwrap().id(), value);
    let key = tree.node(value).unwrap().parent().unwrap();
    assert_eq!(key.kind(), Kind::Key);
    assert_eq!(key.parent().unwrap().id(), a);
}

#[test]
fn self_attachment_is_rejected() {
    let mut tree = PlistTree::new();
    let dict = tree.new_dict();
    assert!(matches!(
        tree.dict_set(dict, "me", dict),
        Err(PlistError::InvalidParameter(_))
    ));

    let array = tree.new_array();
    assert!(matches!(
        tree.array_append(array, array),
        Err(PlistError::InvalidParameter(_))
    ));
}

#[test]
fn wrong_kind_operations() {
    let mut tree = PlistTree::new();
    let s = tree.new_string("x");
    let v = tree.new_integer(1);
    assert_eq!(tree.dict_set(s, "k", v), Err(PlistError::WrongKind));
    assert_eq!(tree.array_append(s, v), Err(PlistError::WrongKind));
    assert_eq!(tree.dict_pop(s, "k").err(), Some(PlistError::WrongKind));
    assert!(!tree.dict_has(s, "k"));
}

#[test]
fn array_insert_bounds() {
    let mut tree = PlistTree::new();
    let array = tree.new_array();

    let one = tree.new_integer(1);
    tree.array_append(array, one).unwrap();
    let three = tree.new_integer(3);
    // Inserting at exactly `count` is an append.
    tree.array_insert(array, 1, three).unwrap();
    let two = tree.new_integer(2);
    tree.array_insert(array, 1, two).unwrap();

    let got: Vec<i64> = tree
        .node(array)
        .unwrap()
        .children()
        .map(|n| n.as_integer().unwrap())
        .collect();
    assert_eq!(got, vec![1, 2, 3]);

    let four = tree.new_integer(4);
    assert_eq!(
        tree.array_insert(array, 5, four),
        Err(PlistError::OutOfRange)
    );
    // `count` is legal for insert but not for pop/del.
    assert_eq!(tree.array_pop(array, 3).err(), Some(PlistError::OutOfRange));
    assert_eq!(tree.array_del(array, 3), Err(PlistError::OutOfRange));
}

#[test]
fn array_pop_detaches_and_del_releases() {
    let mut tree = PlistTree::new();
    let array = tree.new_array();
    for v in 0..3 {
        let n = tree.new_integer(v);
        tree.array_append(array, n).unwrap();
    }
    let baseline = tree.node_count();

    let popped = tree.array_pop(array, 1).unwrap();
    assert_eq!(tree.node(popped).unwrap().as_integer(), Some(1));
    assert!(tree.node(popped).unwrap().parent().is_none());
    assert_eq!(tree.node(array).unwrap().len(), 2);
    // Popping transfers ownership; nothing was freed.
    assert_eq!(tree.node_count(), baseline);

    tree.array_del(array, 0).unwrap();
    assert_eq!(tree.node(array).unwrap().len(), 1);
    assert_eq!(tree.node_count(), baseline - 1);
}

#[test]
fn dict_pop_and_del() {
    let (mut tree, dict) = sample_tree();
    let baseline = tree.node_count();

    assert_eq!(tree.dict_pop(dict, "missing").err(), Some(PlistError::NotFound));

    let age = tree.dict_pop(dict, "age").unwrap();
    assert_eq!(tree.node(age).unwrap().as_integer(), Some(37));
    assert!(tree.node(age).unwrap().parent().is_none());
    // The key wrapper was freed, the value handed back.
    assert_eq!(tree.node_count(), baseline - 1);
    assert!(!tree.dict_has(dict, "age"));

    tree.dict_del(dict, "name").unwrap();
    assert!(!tree.dict_has(dict, "name"));

    tree.release(age).unwrap();
    check_invariants(tree.node(dict).unwrap());
}

#[test]
fn copy_is_equal_and_disjoint() {
    let (mut tree, dict) = sample_tree();
    let baseline = tree.node_count();

    let copy = tree.copy(dict).unwrap();
    assert_ne!(copy, dict);
    assert!(tree.node(copy).unwrap().parent().is_none());
    // A copy duplicates every node of the subtree.
    assert_eq!(tree.node_count(), baseline * 2);
    assert_eq!(tree.node(dict).unwrap(), tree.node(copy).unwrap());
    check_invariants(tree.node(copy).unwrap());

    // Disjoint storage: releasing the original leaves the copy intact.
    tree.release(dict).unwrap();
    assert_eq!(tree.node_count(), baseline);
    let root = tree.node(copy).unwrap();
    assert_eq!(root.get("name").unwrap().as_str(), Some("Alice"));
    assert_eq!(root.get("tags").unwrap().at(0).unwrap().as_boolean(), Some(true));
}

#[test]
fn release_frees_the_whole_subtree() {
    let (mut tree, dict) = sample_tree();
    assert!(tree.node_count() > 0);

    tree.release(dict).unwrap();
    assert_eq!(tree.node_count(), 0);
    assert!(tree.node(dict).is_none());
}

#[test]
fn release_detaches_from_the_parent_first() {
    let (mut tree, dict) = sample_tree();
    let tags = tree.dict_get(dict, "tags").unwrap();
    let key = tree.node(tags).unwrap().parent().unwrap().id();

    // Releasing the key removes the whole entry from the dict.
    tree.release(key).unwrap();
    assert_eq!(tree.node(dict).unwrap().len(), 2);
    assert!(!tree.dict_has(dict, "tags"));
    check_invariants(tree.node(dict).unwrap());
}

#[test]
fn deep_trees_copy_and_release_iteratively() {
    let mut tree = PlistTree::new();
    let root = tree.new_array();
    let mut cur = root;
    for _ in 0..10_000 {
        let next = tree.new_array();
        tree.array_append(cur, next).unwrap();
        cur = next;
    }
    let leaf = tree.new_integer(7);
    tree.array_append(cur, leaf).unwrap();

    let copy = tree.copy(root).unwrap();
    assert_eq!(tree.node(root).unwrap(), tree.node(copy).unwrap());

    tree.release(root).unwrap();
    tree.release(copy).unwrap();
    assert_eq!(tree.node_count(), 0);
}

#[test]
fn update_merges_replaces_and_appends() {
    let mut tree = PlistTree::new();

    let dst = tree.new_dict();
    let a = tree.new_integer(1);
    tree.dict_set(dst, "a", a).unwrap();
    let b = tree.new_integer(2);
    tree.dict_set(dst, "b", b).unwrap();

    let src = tree.new_dict();
    let b2 = tree.new_integer(20);
    tree.dict_set(src, "b", b2).unwrap();
    let c = tree.new_integer(30);
    tree.dict_set(src, "c", c).unwrap();

    tree.dict_update(dst, src).unwrap();

    let root = tree.node(dst).unwrap();
    assert_eq!(root.len(), 3);
    assert_eq!(root.get("a").unwrap().as_integer(), Some(1));
    assert_eq!(root.get("b").unwrap().as_integer(), Some(20));
    assert_eq!(root.get("c").unwrap().as_integer(), Some(30));
    // The replaced entry moved to the tail; `src` itself is untouched.
    let names: Vec<&str> = root.children().map(|k| k.key_name().unwrap()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(tree.node(src).unwrap().len(), 2);
    check_invariants(root);
}

#[test]
fn update_accepts_a_single_key_and_an_array_of_keys() {
    let mut tree = PlistTree::new();
    let dst = tree.new_dict();

    let v = tree.new_string("x");
    let key = tree.new_key("k", v).unwrap();
    tree.dict_update(dst, key).unwrap();
    assert_eq!(tree.node(dst).unwrap().get("k").unwrap().as_str(), Some("x"));

    let batch = tree.new_array();
    let v1 = tree.new_integer(1);
    let k1 = tree.new_key("one", v1).unwrap();
    tree.array_append(batch, k1).unwrap();
    let v2 = tree.new_integer(2);
    let k2 = tree.new_key("two", v2).unwrap();
    tree.array_append(batch, k2).unwrap();

    tree.dict_update(dst, batch).unwrap();
    let root = tree.node(dst).unwrap();
    assert_eq!(root.len(), 3);
    assert_eq!(root.get("one").unwrap().as_integer(), Some(1));
    assert_eq!(root.get("two").unwrap().as_integer(), Some(2));
}

#[test]
fn update_rejects_bad_shapes_without_changing_the_dict() {
    let mut tree = PlistTree::new();
    let dst = tree.new_dict();
    let a = tree.new_integer(1);
    tree.dict_set(dst, "a", a).unwrap();
    let baseline = tree.node_count();

    let scalar = tree.new_integer(9);
    assert_eq!(tree.dict_update(dst, scalar), Err(PlistError::WrongKind));

    // An array with a non-Key element is rejected as a whole.
    let batch = tree.new_array();
    let v = tree.new_string("x");
    let k = tree.new_key("k", v).unwrap();
    tree.array_append(batch, k).unwrap();
    let stray = tree.new_integer(5);
    tree.array_append(batch, stray).unwrap();
    assert_eq!(tree.dict_update(dst, batch), Err(PlistError::WrongKind));

    // No staged copy leaked and the destination is unchanged.
    let root = tree.node(dst).unwrap();
    assert_eq!(root.len(), 1);
    assert_eq!(root.get("a").unwrap().as_integer(), Some(1));
    assert!(tree.node_count() > baseline);
    tree.release(batch).unwrap();
    tree.release(scalar).unwrap();
    assert_eq!(tree.node_count(), baseline);
}

#[test]
fn parsed_and_constructed_trees_compare_equal() {
    let plist = parse(b"{ \"name\" : \"Alice\" ; \"age\" : 37 ; \"tags\" : ( true , <0102> ) ; }")
        .unwrap();
    let (tree, dict) = sample_tree();

    assert_eq!(plist.root().unwrap(), tree.node(dict).unwrap());
    check_invariants(plist.root().unwrap());
}

#[test]
fn scalar_parse_round_trips() {
    let mut tree = PlistTree::new();

    let n = tree.new_integer(-42);
    let rendered = format!("{} ", tree.node(n).unwrap());
    let reparsed = parse(rendered.as_bytes()).unwrap();
    assert_eq!(reparsed.root().unwrap(), tree.node(n).unwrap());

    let s = tree.new_string("hi\tthere");
    let rendered = format!("{}", tree.node(s).unwrap());
    let reparsed = parse(rendered.as_bytes()).unwrap();
    assert_eq!(reparsed.root().unwrap(), tree.node(s).unwrap());

    let b = tree.new_boolean(true);
    let rendered = format!("{}", tree.node(b).unwrap());
    let reparsed = parse(rendered.as_bytes()).unwrap();
    assert_eq!(reparsed.root().unwrap(), tree.node(b).unwrap());
}

#[test]
fn dump_renders_nested_structure() {
    let plist = parse(b"{ \"name\" : \"Alice\" ; \"age\" : 37 ; }").unwrap();
    let mut out = String::new();
    dump(plist.root().unwrap(), &mut out).unwrap();
    assert_eq!(
        out,
        "{\n        \"name\" = \"Alice\";\n        \"age\" = 37;\n}"
    );

    let plist = parse(b"( 1 , ( true ) )").unwrap();
    let mut out = String::new();
    dump(plist.root().unwrap(), &mut out).unwrap();
    assert_eq!(
        out,
        "(\n        1,\n        (\n                true,\n        ),\n)"
    );
}

#[test]
fn kind_introspection() {
    let (tree, dict) = sample_tree();
    assert_eq!(tree.kind(dict).unwrap(), Kind::Dict);
    assert_eq!(tree.kind(dict).unwrap().as_name(), "dict");
    assert_eq!(Kind::from_name("ARRAY"), Kind::Array);
    assert_eq!(Kind::from_name("no-such-kind"), Kind::Unknown);

    let key = tree.node(dict).unwrap().children().next().unwrap();
    assert_eq!(key.kind(), Kind::Key);
    assert_eq!(key.kind().as_name(), "key");
}
