//! A small multi-page application driven by one shared delegator.
//!
//! Renders home / login / profile / not-found pages as node trees inside a
//! single container, registers every interaction through one
//! [`EventDelegator`], and walks through the flow with simulated events.
//! Run with `RUST_LOG=debug` to watch listeners attach and detach.

use std::cell::RefCell;
use std::rc::Rc;

use skiff::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Home,
    Login,
    Profile,
    NotFound,
}

/// What the app knows about the signed-in user.
#[derive(Debug, Default)]
struct Profile {
    username: String,
    email: String,
}

struct App {
    container: Node,
    delegator: EventDelegator,
    route: RefCell<Route>,
    profile: RefCell<Profile>,
}

impl App {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            container: Node::new("div"),
            delegator: EventDelegator::new(),
            route: RefCell::new(Route::Home),
            profile: RefCell::new(Profile::default()),
        })
    }

    /// Rebuild the container for the current route and re-wire delegation.
    fn render(self: &Rc<Self>) -> Node {
        let route = *self.route.borrow();
        tracing::info!("Rendering {:?}", route);

        for child in self.container.children() {
            let _ = self.container.remove_child(&child);
        }
        self.delegator.clear();

        let page = match route {
            Route::Home => self.render_home(),
            Route::Login => self.render_login(),
            Route::Profile => self.render_profile(),
            Route::NotFound => self.render_not_found(),
        };
        self.container
            .append_child(&page)
            .unwrap_or_else(|e| panic!("container rejected page: {e}"));
        self.delegator.bind_root(&self.container);
        self.wire_nav(&page);
        page
    }

    fn navigate(self: &Rc<Self>, route: Route) {
        *self.route.borrow_mut() = route;
        self.render();
    }

    /// One delegated click handler serves the whole nav list.
    fn wire_nav(self: &Rc<Self>, page: &Node) {
        let Some(nav) = page.children().into_iter().find(|n| n.tag() == "nav") else {
            return;
        };
        let items: Vec<(Node, Route)> = nav
            .children()
            .into_iter()
            .zip([Route::Home, Route::Profile, Route::Login])
            .collect();

        let app = Rc::clone(self);
        self.delegator
            .register("click", &nav, move |event| {
                let Some((_, route)) = items.iter().find(|(node, _)| node == event.target())
                else {
                    tracing::warn!("Click on unknown nav entry {:?}", event.target());
                    app.navigate(Route::NotFound);
                    return;
                };
                app.navigate(*route);
            })
            .unwrap_or_else(|e| panic!("nav wiring failed: {e}"));
    }

    fn render_nav(&self) -> Node {
        let nav = Node::new("nav");
        for _ in 0..3 {
            let item = Node::new("li");
            nav.append_child(&item).unwrap_or_else(|e| panic!("{e}"));
        }
        nav
    }

    fn render_home(self: &Rc<Self>) -> Node {
        let page = Node::new("section");
        page.append_child(&Node::new("header")).unwrap_or_else(|e| panic!("{e}"));
        page.append_child(&self.render_nav()).unwrap_or_else(|e| panic!("{e}"));
        page.append_child(&Node::new("main")).unwrap_or_else(|e| panic!("{e}"));
        page.append_child(&Node::new("footer")).unwrap_or_else(|e| panic!("{e}"));
        page
    }

    fn render_login(self: &Rc<Self>) -> Node {
        let page = Node::new("section");
        page.append_child(&self.render_nav()).unwrap_or_else(|e| panic!("{e}"));

        let form = Node::new("form");
        page.append_child(&form).unwrap_or_else(|e| panic!("{e}"));

        let app = Rc::clone(self);
        self.delegator
            .register("submit", &form, move |event| {
                event.prevent_default();
                *app.profile.borrow_mut() = Profile {
                    username: String::from("testuser"),
                    email: String::from("test@example.com"),
                };
                tracing::info!("Logged in, heading to the profile page");
                app.navigate(Route::Profile);
            })
            .unwrap_or_else(|e| panic!("login wiring failed: {e}"));
        page
    }

    fn render_profile(self: &Rc<Self>) -> Node {
        let page = Node::new("section");
        page.append_child(&self.render_nav()).unwrap_or_else(|e| panic!("{e}"));

        let form = Node::new("form");
        page.append_child(&form).unwrap_or_else(|e| panic!("{e}"));

        let app = Rc::clone(self);
        self.delegator
            .register("submit", &form, move |event| {
                event.prevent_default();
                let mut profile = app.profile.borrow_mut();
                profile.email = String::from("updated@example.com");
                tracing::info!("Profile updated: {:?}", profile);
            })
            .unwrap_or_else(|e| panic!("profile wiring failed: {e}"));
        page
    }

    fn render_not_found(&self) -> Node {
        Node::new("section")
    }
}

fn main() {
    let _ = tracing_subscriber::fmt::try_init();

    let app = App::new();
    let home = app.render();

    // Click the "login" nav entry on the home page.
    let nav = home
        .children()
        .into_iter()
        .find(|n| n.tag() == "nav")
        .expect("home page has a nav");
    nav.children()[2].fire("click");
    assert_eq!(*app.route.borrow(), Route::Login);

    // Submit the login form; the handler signs us in and navigates.
    let login_page = app.container.children()[0].clone();
    let form = login_page
        .children()
        .into_iter()
        .find(|n| n.tag() == "form")
        .expect("login page has a form");
    form.fire("submit");
    assert_eq!(*app.route.borrow(), Route::Profile);

    // Submit the profile form; the event lands on the form's button but the
    // delegated handler on the form still picks it up.
    let profile_page = app.container.children()[0].clone();
    let form = profile_page
        .children()
        .into_iter()
        .find(|n| n.tag() == "form")
        .expect("profile page has a form");
    let button = Node::new("button");
    form.append_child(&button).expect("button attaches to form");
    button.fire("submit");
    assert_eq!(app.profile.borrow().email, "updated@example.com");

    tracing::info!(
        "Done. {} handler(s) live, container holds {} native listener(s)",
        app.delegator.handler_count(),
        app.container.listener_count()
    );
}
