use fxinject::bootstrap;
use fxinject::controller::ControllerFactory;
use std::any::TypeId;

mod ui {
    use fxinject::instance_provider::ComponentInstancePtr;
    use fxinject::Component;

    #[derive(Component)]
    pub struct DocumentStore;

    // a controller is an ordinary component - a markup loader asks the factory for it by type
    #[derive(Component)]
    pub struct EditorController {
        pub store: ComponentInstancePtr<DocumentStore>,
    }
}

mod dialogs {
    use fxinject::Component;

    // never scanned below - with a fallback registered, the factory still serves a bare
    // instance, like a loader constructing the controller itself
    #[derive(Component, Default)]
    #[component(fallback)]
    pub struct AboutDialogController;
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    // one call: scan the base modules and wrap the container for a markup loader
    let (container, _factory) = bootstrap::initialize(&[concat!(module_path!(), "::ui")]).unwrap();

    // a factory with fallback also covers controllers outside the scanned modules
    let factory = ControllerFactory::with_fallback(container.clone());

    let editor = factory.controller_typed::<ui::EditorController>().unwrap().unwrap();
    println!(
        "editor controller shares the scanned store: {}",
        fxinject::instance_provider::ComponentInstancePtr::ptr_eq(
            &editor.store,
            &container.get_component::<ui::DocumentStore>().unwrap()
        )
    );

    let about = factory
        .controller_typed::<dialogs::AboutDialogController>()
        .unwrap();
    println!("about dialog served via fallback: {}", about.is_some());

    // the closure shape a markup loader accepts as its controller factory
    let factory_fn = factory.into_factory_fn();
    println!(
        "loader callback produced an instance: {}",
        factory_fn(TypeId::of::<ui::EditorController>()).is_some()
    );
}
