mod lang_test;
