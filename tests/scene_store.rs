use std::cell::RefCell;
use std::rc::Rc;

use egui::pos2;
use whiteboard::element::{factory, Element, ElementType, ShapeKind};
use whiteboard::style::{StyleDefaults, StylePatch};
use whiteboard::{Color, Scene, SceneEvent};

fn rect_at(x: f32, y: f32) -> ElementType {
    factory::create_shape(ShapeKind::Rect, pos2(x, y), &StyleDefaults::default())
}

/// Subscribe a recorder and hand back the shared event log.
fn record_events(scene: &mut Scene) -> Rc<RefCell<Vec<SceneEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    scene.subscribe(Box::new(move |event: &SceneEvent, _scene: &Scene| {
        sink.borrow_mut().push(event.clone());
    }));
    log
}

#[test]
fn test_each_mutation_emits_exactly_one_event() {
    let mut scene = Scene::new();
    let events = record_events(&mut scene);

    let id = scene.add(rect_at(0.0, 0.0));
    scene.modify(id, &StylePatch::Stroke(Color::WHITE));
    scene.set_background(Some(Color::BLACK));
    scene.remove(id);
    scene.clear();
    scene.replace_all(vec![rect_at(1.0, 1.0), rect_at(2.0, 2.0)], None);

    assert_eq!(
        *events.borrow(),
        vec![
            SceneEvent::Added { id, index: 0 },
            SceneEvent::Modified { id },
            SceneEvent::BackgroundChanged {
                color: Some(Color::BLACK)
            },
            SceneEvent::Removed { id, index: 0 },
            SceneEvent::Cleared,
            SceneEvent::Loaded { count: 2 },
        ]
    );
}

#[test]
fn test_selection_changes_are_silent() {
    let mut scene = Scene::new();
    let id = scene.add(rect_at(0.0, 0.0));
    let events = record_events(&mut scene);

    scene.select(Some(id));
    scene.select(None);

    assert!(events.borrow().is_empty());
}

#[test]
fn test_selection_only_references_present_elements() {
    let mut scene = Scene::new();
    let id = scene.add(rect_at(0.0, 0.0));
    let stray = rect_at(5.0, 5.0).id();

    scene.select(Some(stray));
    assert_eq!(scene.selected(), None);

    scene.select(Some(id));
    assert_eq!(scene.selected_element().map(|e| e.id()), Some(id));

    scene.remove(id);
    assert_eq!(scene.selected(), None);
}

#[test]
fn test_removing_an_absent_id_is_a_silent_noop() {
    let mut scene = Scene::new();
    let id = scene.add(rect_at(0.0, 0.0));
    scene.remove(id);
    let events = record_events(&mut scene);

    assert!(scene.remove(id).is_none());
    assert!(!scene.modify(id, &StylePatch::Angle(10.0)));
    assert!(events.borrow().is_empty());
}

#[test]
fn test_insert_with_existing_id_replaces_in_place() {
    let mut scene = Scene::new();
    let first = scene.add(rect_at(0.0, 0.0));
    scene.add(rect_at(100.0, 0.0));

    let changed = scene.element(first).unwrap().patched(&StylePatch::Angle(30.0)).unwrap();
    scene.insert(5, changed.clone());

    assert_eq!(scene.len(), 2);
    assert_eq!(scene.index_of(first), Some(0));
    assert_eq!(scene.element(first), Some(&changed));
}

#[test]
fn test_insert_clamps_index() {
    let mut scene = Scene::new();
    scene.add(rect_at(0.0, 0.0));
    let id = scene.insert(99, rect_at(1.0, 1.0));

    assert_eq!(scene.index_of(id), Some(1));
}

#[test]
fn test_hit_test_returns_topmost() {
    let mut scene = Scene::new();
    let bottom = scene.add(rect_at(0.0, 0.0));
    let top = scene.add(rect_at(20.0, 20.0));

    assert_eq!(scene.hit_test(pos2(10.0, 10.0)), Some(top));
    assert_eq!(scene.hit_test(pos2(-40.0, -40.0)), Some(bottom));
    assert_eq!(scene.hit_test(pos2(500.0, 500.0)), None);
}

#[test]
fn test_clear_and_load_bump_generation() {
    let mut scene = Scene::new();
    assert_eq!(scene.generation(), 0);

    scene.add(rect_at(0.0, 0.0));
    assert_eq!(scene.generation(), 0);

    scene.clear();
    assert_eq!(scene.generation(), 1);
    assert!(scene.is_empty());
    assert_eq!(scene.background(), None);

    scene.replace_all(Vec::new(), Some(Color::WHITE));
    assert_eq!(scene.generation(), 2);
    assert_eq!(scene.background(), Some(Color::WHITE));
}

#[test]
fn test_unsubscribed_observer_is_not_called() {
    let mut scene = Scene::new();
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let observer = scene.subscribe(Box::new(move |_: &SceneEvent, _: &Scene| {
        *counter.borrow_mut() += 1;
    }));

    scene.add(rect_at(0.0, 0.0));
    assert!(scene.unsubscribe(observer));
    scene.add(rect_at(1.0, 1.0));

    assert_eq!(*count.borrow(), 1);
    assert!(!scene.unsubscribe(observer));
}

#[test]
fn test_observer_sees_the_mutated_scene() {
    let mut scene = Scene::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    scene.subscribe(Box::new(move |_: &SceneEvent, scene: &Scene| {
        sink.borrow_mut().push(scene.len());
    }));

    let id = scene.add(rect_at(0.0, 0.0));
    scene.add(rect_at(1.0, 1.0));
    scene.remove(id);

    assert_eq!(*seen.borrow(), vec![1, 2, 1]);
}
