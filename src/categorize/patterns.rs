//! Path pattern tables per page category
//!
//! Patterns are normalized paths: lowercase, no trailing slash, no file
//! extension. Languages covered: English, Spanish, French, German, Italian,
//! Portuguese, Dutch.

pub(super) const HOME: &[&str] = &[
    "/", "/home", "/index", "/default", "/inicio", "/accueil", "/startseite", "/start",
    "/casa", "/pagina-inicial", "/en", "/es", "/fr", "/de", "/it", "/pt", "/nl", "/en-us",
    "/en-gb", "/es-es", "/es-mx", "/fr-fr", "/fr-ca", "/de-de", "/de-at", "/it-it", "/pt-br",
    "/pt-pt", "/nl-nl", "/nl-be",
];

pub(super) const CONTACT: &[&str] = &[
    "/contact", "/contact-us", "/contactus", "/get-in-touch", "/reach-us", "/contacto",
    "/contactanos", "/contacte", "/nous-contacter", "/contactez-nous", "/kontakt",
    "/kontaktieren", "/contatti", "/contattaci", "/contato", "/fale-conosco", "/contacteer-ons",
];

pub(super) const ABOUT: &[&str] = &[
    "/about", "/about-us", "/aboutus", "/who-we-are", "/our-story", "/our-team", "/team",
    "/company", "/sobre", "/sobre-nosotros", "/quienes-somos", "/nosotros", "/a-propos",
    "/qui-sommes-nous", "/ueber-uns", "/uber-uns", "/über-uns", "/unternehmen", "/chi-siamo",
    "/azienda", "/sobre-nos", "/quem-somos", "/over-ons", "/wie-zijn-wij",
];

pub(super) const PRODUCTS: &[&str] = &[
    "/products", "/product", "/shop", "/store", "/catalog", "/catalogue", "/collections",
    "/services", "/solutions", "/productos", "/producto", "/tienda", "/servicios", "/produits",
    "/produit", "/boutique", "/produkte", "/produkt", "/dienstleistungen", "/prodotti",
    "/prodotto", "/negozio", "/servizi", "/produtos", "/produto", "/loja", "/servicos",
    "/producten", "/winkel", "/diensten",
];

pub(super) const BLOG: &[&str] = &[
    "/blog", "/news", "/articles", "/article", "/posts", "/insights", "/stories", "/press",
    "/noticias", "/articulos", "/actualites", "/actualités", "/nouvelles", "/neuigkeiten",
    "/nachrichten", "/aktuelles", "/notizie", "/articoli", "/novidades", "/artigos",
    "/nieuws", "/artikelen",
];

pub(super) const FAQ: &[&str] = &[
    "/faq", "/faqs", "/help", "/support", "/frequently-asked-questions", "/help-center",
    "/preguntas-frecuentes", "/ayuda", "/aide", "/questions-frequentes", "/hilfe",
    "/haeufige-fragen", "/häufige-fragen", "/domande-frequenti", "/aiuto", "/perguntas-frequentes",
    "/ajuda", "/veelgestelde-vragen", "/hulp",
];

pub(super) const PRIVACY: &[&str] = &[
    "/privacy", "/privacy-policy", "/privacypolicy", "/cookie-policy", "/cookies", "/gdpr",
    "/terms", "/terms-of-service", "/legal", "/privacidad", "/politica-de-privacidad",
    "/aviso-legal", "/confidentialite", "/politique-de-confidentialite", "/mentions-legales",
    "/datenschutz", "/datenschutzerklaerung", "/impressum", "/informativa-privacy",
    "/privacidade", "/politica-de-privacidade", "/privacybeleid",
];

pub(super) const LOGIN: &[&str] = &[
    "/login", "/log-in", "/signin", "/sign-in", "/account/login", "/user/login", "/my-account",
    "/register", "/signup", "/sign-up", "/iniciar-sesion", "/acceso", "/registro",
    "/connexion", "/se-connecter", "/inscription", "/anmelden", "/anmeldung", "/registrieren",
    "/accedi", "/registrati", "/entrar", "/cadastro", "/inloggen", "/registreren",
];

pub(super) const CART: &[&str] = &[
    "/cart", "/basket", "/bag", "/checkout", "/shopping-cart", "/carrito", "/cesta",
    "/panier", "/warenkorb", "/kasse", "/carrello", "/cassa", "/carrinho",
    "/winkelwagen", "/winkelmand", "/afrekenen",
];
