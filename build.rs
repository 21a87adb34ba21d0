fn main() {
    // Emit ESP-IDF link arguments only for device builds; host-target
    // test builds carry no embuild dependency.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
