use std::cell::OnceCell;
use std::rc::Rc;
use std::sync::Arc;

use rstest::rstest;

use ontopack::binding::{
    BindingKind, BindingRegistry, IdentifierBinding, PropertyBinding, TypeDeclaration,
};
use ontopack::errors::MappingError;
use ontopack::graph::{Iri, Node, PackageGraph};
use ontopack::literal::{Literal, ScalarKind, ScalarValue};
use ontopack::mapper::{FieldValue, GraphMapper, GraphRecord};

const NS: &str = "https://example.org/ns#";
const BASE: &str = "https://example.org/objects/";

fn iri(local: &str) -> Iri {
    Iri::from_parts(NS, local).expect("valid iri")
}

fn new_graph() -> PackageGraph {
    PackageGraph::new(Iri::new(BASE).expect("valid base"))
}

fn has_literal(node: &Node, predicate: &Iri, lexical: &str, kind: ScalarKind) -> bool {
    node.literals_for(predicate)
        .is_some_and(|values| values.iter().any(|literal| {
            literal.lexical() == lexical && literal.kind() == kind
        }))
}

#[derive(Default)]
struct Person {
    id: String,
    name: Option<String>,
    email: Option<String>,
}

impl GraphRecord for Person {
    fn declaration(&self) -> TypeDeclaration {
        TypeDeclaration::new::<Self>("Person")
            .with_class(iri("Person"))
            .with_identifier(IdentifierBinding::new("id"))
            .with_property(PropertyBinding::single(
                "name",
                iri("hasName"),
                BindingKind::Literal,
            ))
            .with_property(PropertyBinding::single(
                "email",
                iri("hasEmail"),
                BindingKind::Literal,
            ))
    }

    fn read(&self, field: &str) -> FieldValue<'_> {
        match field {
            "id" => FieldValue::text(self.id.as_str()),
            "name" => FieldValue::opt_text(self.name.as_deref()),
            "email" => FieldValue::opt_text(self.email.as_deref()),
            _ => FieldValue::Absent,
        }
    }
}

#[derive(Default)]
struct Container {
    id: String,
    title: Option<String>,
    tags: Vec<String>,
    owner: Option<Person>,
    badges: Vec<Badge>,
}

impl GraphRecord for Container {
    fn declaration(&self) -> TypeDeclaration {
        TypeDeclaration::new::<Self>("Container")
            .with_class(iri("Container"))
            .with_identifier(IdentifierBinding::new("id"))
            .with_property(PropertyBinding::single(
                "title",
                iri("hasTitle"),
                BindingKind::Literal,
            ))
            .with_property(PropertyBinding::multi(
                "tags",
                iri("hasTag"),
                BindingKind::Literal,
            ))
            .with_property(PropertyBinding::single(
                "owner",
                iri("hasOwner"),
                BindingKind::Nested,
            ))
            .with_property(PropertyBinding::multi(
                "badges",
                iri("hasBadge"),
                BindingKind::Embedded,
            ))
    }

    fn read(&self, field: &str) -> FieldValue<'_> {
        match field {
            "id" => FieldValue::text(self.id.as_str()),
            "title" => FieldValue::opt_text(self.title.as_deref()),
            "tags" => FieldValue::texts(self.tags.clone()),
            "owner" => self
                .owner
                .as_ref()
                .map_or(FieldValue::Absent, |owner| FieldValue::record(owner)),
            "badges" => FieldValue::records(
                self.badges
                    .iter()
                    .map(|badge| badge as &dyn GraphRecord)
                    .collect(),
            ),
            _ => FieldValue::Absent,
        }
    }
}

/// Embedded structure without an identifier: every occurrence is anonymous.
struct Badge {
    label: String,
}

impl GraphRecord for Badge {
    fn declaration(&self) -> TypeDeclaration {
        TypeDeclaration::new::<Self>("Badge")
            .with_class(iri("Badge"))
            .with_property(PropertyBinding::single(
                "label",
                iri("hasLabel"),
                BindingKind::Literal,
            ))
    }

    fn read(&self, field: &str) -> FieldValue<'_> {
        match field {
            "label" => FieldValue::text(self.label.as_str()),
            _ => FieldValue::Absent,
        }
    }
}

#[test]
fn container_and_person_end_to_end() {
    let mut graph = new_graph();
    let mut mapper = GraphMapper::new(Arc::new(BindingRegistry::new()), &mut graph);

    let container = Container {
        id: "abc123".into(),
        title: Some("Demo".into()),
        owner: Some(Person {
            id: "u1".into(),
            name: Some("Ann".into()),
            ..Person::default()
        }),
        ..Container::default()
    };

    mapper.process(&container).expect("container maps");

    let root = graph
        .find(&graph.resolve("abc123").expect("resolves"))
        .expect("root registered");
    let owner = graph
        .find(&graph.resolve("u1").expect("resolves"))
        .expect("owner registered");

    let root_node = graph.node(root);
    assert!(root_node.has_class(&iri("Container")));
    assert!(has_literal(root_node, &iri("hasTitle"), "Demo", ScalarKind::Text));
    assert!(root_node
        .edges_for(&iri("hasOwner"))
        .is_some_and(|targets| targets.contains(&owner)));

    let owner_node = graph.node(owner);
    assert!(owner_node.has_class(&iri("Person")));
    assert!(has_literal(owner_node, &iri("hasName"), "Ann", ScalarKind::Text));
}

#[test]
fn processing_the_same_identifier_twice_merges_into_one_node() {
    let mut graph = new_graph();
    let registry = Arc::new(BindingRegistry::new());
    let mut mapper = GraphMapper::new(Arc::clone(&registry), &mut graph);

    let first = Person {
        id: "u1".into(),
        name: Some("Ann".into()),
        ..Person::default()
    };
    let second = Person {
        id: "u1".into(),
        email: Some("ann@example.org".into()),
        ..Person::default()
    };

    let a = mapper.process(&first).expect("first maps");
    let b = mapper.process(&second).expect("second maps");
    assert_eq!(a, b);
    assert_eq!(graph.identified_count(), 1);

    let node = graph.node(a);
    assert!(has_literal(node, &iri("hasName"), "Ann", ScalarKind::Text));
    assert!(has_literal(
        node,
        &iri("hasEmail"),
        "ann@example.org",
        ScalarKind::Text
    ));
}

#[test]
fn diverging_single_values_union_rather_than_overwrite() {
    let mut graph = new_graph();
    let mut mapper = GraphMapper::new(Arc::new(BindingRegistry::new()), &mut graph);

    let first = Person {
        id: "u1".into(),
        name: Some("Ann".into()),
        ..Person::default()
    };
    let second = Person {
        id: "u1".into(),
        name: Some("Anne".into()),
        ..Person::default()
    };

    let node = mapper.process(&first).expect("first maps");
    mapper.process(&second).expect("second maps");

    let names = graph
        .node(node)
        .literals_for(&iri("hasName"))
        .expect("names asserted");
    assert_eq!(names.len(), 2);
}

#[test]
fn anonymous_records_are_never_deduplicated() {
    let mut graph = new_graph();
    let mut mapper = GraphMapper::new(Arc::new(BindingRegistry::new()), &mut graph);

    let container = Container {
        id: "abc123".into(),
        badges: vec![
            Badge {
                label: "gold".into(),
            },
            Badge {
                label: "gold".into(),
            },
        ],
        ..Container::default()
    };

    let root = mapper.process(&container).expect("container maps");

    assert_eq!(graph.anonymous_count(), 2);
    let targets = graph
        .node(root)
        .edges_for(&iri("hasBadge"))
        .expect("badge edges");
    assert_eq!(targets.len(), 2);
    for target in targets {
        let badge = graph.node(*target);
        assert!(badge.is_anonymous());
        assert!(has_literal(badge, &iri("hasLabel"), "gold", ScalarKind::Text));
    }
}

#[test]
fn duplicate_collection_elements_collapse_to_one_value() {
    let mut graph = new_graph();
    let mut mapper = GraphMapper::new(Arc::new(BindingRegistry::new()), &mut graph);

    let container = Container {
        id: "abc123".into(),
        tags: vec!["shared".into(), "shared".into(), "open".into()],
        ..Container::default()
    };

    let root = mapper.process(&container).expect("container maps");
    let tags = graph
        .node(root)
        .literals_for(&iri("hasTag"))
        .expect("tags asserted");
    assert_eq!(tags.len(), 2);
}

#[test]
fn absent_values_skip_while_empty_strings_assert() {
    let mut graph = new_graph();
    let mut mapper = GraphMapper::new(Arc::new(BindingRegistry::new()), &mut graph);

    let absent = Person {
        id: "u1".into(),
        ..Person::default()
    };
    let node = mapper.process(&absent).expect("maps");
    assert!(mapper
        .graph()
        .node(node)
        .literals_for(&iri("hasName"))
        .is_none());

    let empty = Person {
        id: "u2".into(),
        name: Some(String::new()),
        ..Person::default()
    };
    let node = mapper.process(&empty).expect("maps");
    assert!(has_literal(
        mapper.graph().node(node),
        &iri("hasName"),
        "",
        ScalarKind::Text
    ));
}

struct Resource;

fn resource_declaration() -> TypeDeclaration {
    TypeDeclaration::new::<Resource>("Resource")
        .with_class(iri("Resource"))
        .with_identifier(IdentifierBinding::new("id"))
}

struct Document {
    id: String,
}

impl GraphRecord for Document {
    fn declaration(&self) -> TypeDeclaration {
        TypeDeclaration::new::<Self>("Document")
            .with_class(iri("Document"))
            .extends(resource_declaration())
    }

    fn read(&self, field: &str) -> FieldValue<'_> {
        match field {
            "id" => FieldValue::text(self.id.as_str()),
            _ => FieldValue::Absent,
        }
    }
}

#[test]
fn classes_accumulate_over_the_declaration_chain() {
    let mut graph = new_graph();
    let mut mapper = GraphMapper::new(Arc::new(BindingRegistry::new()), &mut graph);

    let document = Document { id: "d1".into() };
    let node = mapper.process(&document).expect("maps");

    let mapped = graph.node(node);
    assert!(mapped.has_class(&iri("Document")));
    assert!(mapped.has_class(&iri("Resource")));
    assert!(!mapped.has_class(&iri("Person")));
}

/// Identified record whose nested field can close a cycle.
struct Link {
    id: String,
    next: OnceCell<Rc<Link>>,
}

impl Link {
    fn new(id: &str) -> Rc<Self> {
        Rc::new(Self {
            id: id.to_owned(),
            next: OnceCell::new(),
        })
    }
}

impl GraphRecord for Link {
    fn declaration(&self) -> TypeDeclaration {
        TypeDeclaration::new::<Self>("Link")
            .with_class(iri("Link"))
            .with_identifier(IdentifierBinding::new("id"))
            .with_property(PropertyBinding::single(
                "next",
                iri("hasNext"),
                BindingKind::Nested,
            ))
    }

    fn read(&self, field: &str) -> FieldValue<'_> {
        match field {
            "id" => FieldValue::text(self.id.as_str()),
            "next" => self
                .next
                .get()
                .map_or(FieldValue::Absent, |next| FieldValue::record(next.as_ref())),
            _ => FieldValue::Absent,
        }
    }
}

#[test]
fn nested_cycles_fail_fast() {
    let a = Link::new("a");
    let b = Link::new("b");
    assert!(a.next.set(Rc::clone(&b)).is_ok());
    assert!(b.next.set(Rc::clone(&a)).is_ok());

    let mut graph = new_graph();
    let mut mapper = GraphMapper::new(Arc::new(BindingRegistry::new()), &mut graph);

    let err = mapper.process(a.as_ref()).expect_err("cycle detected");
    assert!(matches!(err, MappingError::CycleDetected { type_name } if type_name == "Link"));
}

#[test]
fn a_finite_chain_is_not_a_cycle() {
    let a = Link::new("a");
    let b = Link::new("b");
    assert!(a.next.set(Rc::clone(&b)).is_ok());

    let mut graph = new_graph();
    let mut mapper = GraphMapper::new(Arc::new(BindingRegistry::new()), &mut graph);
    mapper.process(a.as_ref()).expect("chain maps");
    assert_eq!(graph.identified_count(), 2);
}

struct Assignment {
    id: String,
    assignee: String,
}

impl GraphRecord for Assignment {
    fn declaration(&self) -> TypeDeclaration {
        TypeDeclaration::new::<Self>("Assignment")
            .with_class(iri("Assignment"))
            .with_identifier(IdentifierBinding::new("id"))
            .with_property(PropertyBinding::single(
                "assignee",
                iri("hasAssignee"),
                BindingKind::Reference,
            ))
    }

    fn read(&self, field: &str) -> FieldValue<'_> {
        match field {
            "id" => FieldValue::text(self.id.as_str()),
            "assignee" => FieldValue::reference(self.assignee.as_str()),
            _ => FieldValue::Absent,
        }
    }
}

#[test]
fn references_link_without_recursing_into_the_target() {
    let mut graph = new_graph();
    let registry = Arc::new(BindingRegistry::new());
    let mut mapper = GraphMapper::new(Arc::clone(&registry), &mut graph);

    let assignment = Assignment {
        id: "t1".into(),
        assignee: "u9".into(),
    };
    let root = mapper.process(&assignment).expect("maps");

    let target = graph
        .find(&graph.resolve("u9").expect("resolves"))
        .expect("target registered");
    assert!(graph
        .node(root)
        .edges_for(&iri("hasAssignee"))
        .is_some_and(|targets| targets.contains(&target)));

    // The referenced entity is a bare node until processed on its own.
    assert!(graph.node(target).classes().is_empty());
    assert!(graph.node(target).literals().is_empty());

    let mut mapper = GraphMapper::new(registry, &mut graph);
    let user = Person {
        id: "u9".into(),
        name: Some("Noa".into()),
        ..Person::default()
    };
    let processed = mapper.process(&user).expect("user maps");
    assert_eq!(processed, target);
    assert!(graph.node(target).has_class(&iri("Person")));
}

struct Plain {
    value: String,
}

impl GraphRecord for Plain {
    fn declaration(&self) -> TypeDeclaration {
        TypeDeclaration::new::<Self>("Plain").with_property(PropertyBinding::single(
            "value",
            iri("hasValue"),
            BindingKind::Literal,
        ))
    }

    fn read(&self, field: &str) -> FieldValue<'_> {
        match field {
            "value" => FieldValue::text(self.value.as_str()),
            _ => FieldValue::Absent,
        }
    }
}

#[test]
fn unmapped_types_are_rejected() {
    let mut graph = new_graph();
    let mut mapper = GraphMapper::new(Arc::new(BindingRegistry::new()), &mut graph);

    let plain = Plain {
        value: "anything".into(),
    };
    let err = mapper.process(&plain).expect_err("unmapped type");
    assert!(matches!(err, MappingError::UnmappedType { type_name } if type_name == "Plain"));
    assert!(graph.is_empty());
}

#[test]
fn an_empty_identifier_fails_that_object_only() {
    let mut graph = new_graph();
    let mut mapper = GraphMapper::new(Arc::new(BindingRegistry::new()), &mut graph);

    let keeper = Person {
        id: "u1".into(),
        ..Person::default()
    };
    mapper.process(&keeper).expect("maps");

    let broken = Person {
        id: String::new(),
        ..Person::default()
    };
    let err = mapper.process(&broken).expect_err("missing identifier");
    assert!(matches!(
        err,
        MappingError::MissingIdentifier { type_name, field }
            if type_name == "Person" && field == "id"
    ));

    // Earlier progress stays committed.
    assert_eq!(graph.identified_count(), 1);
}

/// Declares a single-valued literal but hands back a collection.
struct Sloppy {
    id: String,
}

impl GraphRecord for Sloppy {
    fn declaration(&self) -> TypeDeclaration {
        TypeDeclaration::new::<Self>("Sloppy")
            .with_class(iri("Sloppy"))
            .with_identifier(IdentifierBinding::new("id"))
            .with_property(PropertyBinding::single(
                "notes",
                iri("hasNote"),
                BindingKind::Literal,
            ))
    }

    fn read(&self, field: &str) -> FieldValue<'_> {
        match field {
            "id" => FieldValue::text(self.id.as_str()),
            "notes" => FieldValue::texts(vec!["a".to_owned(), "b".to_owned()]),
            _ => FieldValue::Absent,
        }
    }
}

#[test]
fn values_that_contradict_their_binding_are_rejected() {
    let mut graph = new_graph();
    let mut mapper = GraphMapper::new(Arc::new(BindingRegistry::new()), &mut graph);

    let sloppy = Sloppy { id: "s1".into() };
    let err = mapper.process(&sloppy).expect_err("shape mismatch");
    assert!(matches!(
        err,
        MappingError::UnexpectedShape { type_name, field }
            if type_name == "Sloppy" && field == "notes"
    ));
}

#[rstest]
#[case(ScalarValue::Bool(true), "true", ScalarKind::Boolean)]
#[case(ScalarValue::Bool(false), "false", ScalarKind::Boolean)]
#[case(
    ScalarValue::date_time("2016-06-03T21:52:35.4Z"),
    "2016-06-03T21:52:35.4Z",
    ScalarKind::DateTime
)]
#[case(ScalarValue::text("Demo"), "Demo", ScalarKind::Text)]
#[case(ScalarValue::text(""), "", ScalarKind::Text)]
fn literal_typing_rules(
    #[case] value: ScalarValue,
    #[case] lexical: &str,
    #[case] kind: ScalarKind,
) {
    let literal = Literal::of(value);
    assert_eq!(literal.lexical(), lexical);
    assert_eq!(literal.kind(), kind);
}
