use soapcharge::entry;
use soapcharge::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
