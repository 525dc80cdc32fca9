/// The page affordances the adapter drives.
///
/// In the browser these are class toggles on fixed elements; the adapter only
/// ever tells the surface which state to show.
pub trait Surface {
    /// Show the connect affordance, hide the connected one.
    fn show_disconnected(&self);

    /// Hide the connect affordance, show the connected one with `account`.
    fn show_connected(&self, account: &str);

    /// Flip to the signed state.
    fn show_signed(&self);

    /// Full page reload. The page instance is discarded afterwards.
    fn reload(&self);
}
