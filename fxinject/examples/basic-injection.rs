use fxinject::bootstrap::create_container;
use fxinject::instance_provider::ComponentInstancePtr;
use fxinject::{component_alias, injectable, scan, Component};

// this is a trait we would like to inject into other components
#[injectable]
trait Repository {
    fn find_user(&self) -> String;
}

// this is a component implementing the above trait
#[derive(Component)]
struct DiskRepository;

// we're telling the container to provide DiskRepository when asked for dyn Repository
#[component_alias]
impl Repository for DiskRepository {
    fn find_user(&self) -> String {
        "admin".to_string()
    }
}

// this is another component, with its dependencies injected during construction
#[derive(Component)]
struct UserService {
    // the abstract trait can be injected, since an alias is registered above
    repository: ComponentInstancePtr<dyn Repository + Send + Sync>,
    // alternatively, the concrete type works too
    _concrete_repository: ComponentInstancePtr<DiskRepository>,
}

impl UserService {
    fn greet(&self) {
        println!("Hello, {}!", self.repository.find_user());
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    // scan the module this macro is invoked in, creating all components found there
    let container = create_container();
    scan!(container).unwrap();

    // all components are created as wired singletons during the scan
    let service = container.get_component::<UserService>().unwrap();
    service.greet();
}
